/// 网盘分享域名，命中才尝试改写。
const SHARE_HOST: &str = "drive.google.com";

/// 将网盘分享链接改写为直链。
///
/// 识别两种文件分享形态：
/// - `.../file/d/<FILE_ID>/view`：取 `/file/d/` 之后、下一个 `/` 之前的路径段；
/// - `...?id=<FILE_ID>&...`：取 `id=` 之后、下一个 `&` 之前的查询值。
///
/// `/folders/` 形态是文件夹分享，没有对应的直链，原样返回。
/// 纯字符串改写：不访问网络，也不校验提取出的文件 ID。
/// 域名不匹配或提取不到 ID 时原样返回输入。
pub fn normalize_share_link(link: &str) -> String {
    if !link.contains(SHARE_HOST) {
        return link.to_string();
    }

    let file_id = if let Some((_, rest)) = link.split_once("/file/d/") {
        rest.split('/').next().unwrap_or("")
    } else if let Some((_, rest)) = link.split_once("id=") {
        rest.split('&').next().unwrap_or("")
    } else {
        // 文件夹分享或其他未知形态
        if link.contains("/folders/") {
            return link.to_string();
        }
        ""
    };

    if file_id.is_empty() {
        return link.to_string();
    }

    format!("https://{SHARE_HOST}/uc?export=view&id={file_id}")
}

#[cfg(test)]
mod tests {
    use super::normalize_share_link;

    #[test]
    fn rewrites_file_segment_form() {
        let out = normalize_share_link("https://drive.google.com/file/d/XYZ123/view?usp=sharing");
        assert_eq!(out, "https://drive.google.com/uc?export=view&id=XYZ123");
    }

    #[test]
    fn rewrites_query_parameter_form() {
        let out = normalize_share_link("https://drive.google.com/open?id=XYZ123&foo=1");
        assert_eq!(out, "https://drive.google.com/uc?export=view&id=XYZ123");
    }

    #[test]
    fn query_parameter_without_trailing_ampersand() {
        let out = normalize_share_link("https://drive.google.com/open?id=XYZ123");
        assert_eq!(out, "https://drive.google.com/uc?export=view&id=XYZ123");
    }

    #[test]
    fn folder_links_are_returned_unchanged() {
        let input = "https://drive.google.com/drive/folders/XYZ123";
        assert_eq!(normalize_share_link(input), input);
    }

    #[test]
    fn unrelated_urls_are_returned_unchanged() {
        let input = "https://cdn.example.com/images/shirt.png";
        assert_eq!(normalize_share_link(input), input);
    }

    #[test]
    fn share_host_without_extractable_id_is_returned_unchanged() {
        let input = "https://drive.google.com/drive/my-drive";
        assert_eq!(normalize_share_link(input), input);

        // `/file/d/` 后直接结束，提取结果为空串
        let input = "https://drive.google.com/file/d/";
        assert_eq!(normalize_share_link(input), input);
    }
}
