use crate::whitelist::{Tagdef, Whitelist};

lazy_static! {
    /// Most of the text-level and grouping content HTML has to offer, including tables and
    /// images. Nothing interactive, no scripting or styling.
    pub static ref RELAXED: Whitelist = vec![
        Tagdef::new(local_name!("a"), &["href", "title"])
            .enforce_protocols("href", &["ftp", "http", "https", "mailto"]),
        Tagdef::new(local_name!("b"), &[]),
        Tagdef::new(local_name!("blockquote"), &["cite"])
            .enforce_protocols("cite", &["http", "https"]),
        Tagdef::new(local_name!("br"), &[]),
        Tagdef::new(local_name!("caption"), &[]),
        Tagdef::new(local_name!("cite"), &["cite"])
            .enforce_protocols("cite", &["http", "https"]),
        Tagdef::new(local_name!("code"), &[]),
        Tagdef::new(local_name!("col"), &["span", "width"]),
        Tagdef::new(local_name!("colgroup"), &["span", "width"]),
        Tagdef::new(local_name!("dd"), &[]),
        Tagdef::new(local_name!("div"), &[]),
        Tagdef::new(local_name!("dl"), &[]),
        Tagdef::new(local_name!("dt"), &[]),
        Tagdef::new(local_name!("em"), &[]),
        Tagdef::new(local_name!("h1"), &[]),
        Tagdef::new(local_name!("h2"), &[]),
        Tagdef::new(local_name!("h3"), &[]),
        Tagdef::new(local_name!("h4"), &[]),
        Tagdef::new(local_name!("h5"), &[]),
        Tagdef::new(local_name!("h6"), &[]),
        Tagdef::new(local_name!("i"), &[]),
        Tagdef::new(
            local_name!("img"),
            &["align", "alt", "height", "src", "title", "width"],
        )
        .enforce_protocols("src", &["http", "https"]),
        Tagdef::new(local_name!("li"), &[]),
        Tagdef::new(local_name!("ol"), &["start", "type"]),
        Tagdef::new(local_name!("p"), &[]),
        Tagdef::new(local_name!("pre"), &[]),
        Tagdef::new(local_name!("q"), &["cite"])
            .enforce_protocols("cite", &["http", "https"]),
        Tagdef::new(local_name!("small"), &[]),
        Tagdef::new(local_name!("span"), &[]),
        Tagdef::new(local_name!("strike"), &[]),
        Tagdef::new(local_name!("strong"), &[]),
        Tagdef::new(local_name!("sub"), &[]),
        Tagdef::new(local_name!("sup"), &[]),
        Tagdef::new(local_name!("table"), &["summary", "width"]),
        Tagdef::new(local_name!("tbody"), &[]),
        Tagdef::new(
            local_name!("td"),
            &["abbr", "axis", "colspan", "rowspan", "width"],
        ),
        Tagdef::new(local_name!("tfoot"), &[]),
        Tagdef::new(
            local_name!("th"),
            &["abbr", "axis", "colspan", "rowspan", "scope", "width"],
        ),
        Tagdef::new(local_name!("thead"), &[]),
        Tagdef::new(local_name!("tr"), &[]),
        Tagdef::new(local_name!("u"), &[]),
        Tagdef::new(local_name!("ul"), &["type"]),
    ]
    .into_iter()
    .collect();
}
