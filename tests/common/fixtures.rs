/// An article page with one `div.html-block > h3` per heading, each followed
/// by a paragraph block.
pub fn article(body_classes: &str, headings: &[&str]) -> String {
    let mut blocks = String::new();
    for (i, heading) in headings.iter().enumerate() {
        blocks.push_str(&format!(
            r#"<div class="html-block"><h3>{}</h3></div><div class="html-block"><p>Paragraph {}</p></div>"#,
            heading, i
        ));
    }
    format!(
        r#"<html><body class="{}">
            <div class="blog-item-title"><h1>An article</h1></div>
            <div class="blog-item-top-wrapper"><div class="meta">Meta</div><div class="share">Share</div></div>
            <div class="blog-item-content">{}</div>
        </body></html>"#,
        body_classes, blocks
    )
}

/// An article whose content region has no headings.
pub fn article_without_headings(body_classes: &str) -> String {
    article(body_classes, &[])
}
