use crate::whitelist::{Tagdef, Whitelist};

lazy_static! {
    /// Text formatting, lists, quotes and links. Links get `rel="nofollow"` and may only point
    /// at ftp, http, https or mailto URLs.
    pub static ref BASIC: Whitelist = vec![
        Tagdef::new(local_name!("a"), &["href"])
            .enforce_attr("rel", "nofollow")
            .enforce_protocols("href", &["ftp", "http", "https", "mailto"]),
        Tagdef::new(local_name!("b"), &[]),
        Tagdef::new(local_name!("blockquote"), &["cite"])
            .enforce_protocols("cite", &["http", "https"]),
        Tagdef::new(local_name!("br"), &[]),
        Tagdef::new(local_name!("cite"), &[]),
        Tagdef::new(local_name!("code"), &[]),
        Tagdef::new(local_name!("dd"), &[]),
        Tagdef::new(local_name!("dl"), &[]),
        Tagdef::new(local_name!("dt"), &[]),
        Tagdef::new(local_name!("em"), &[]),
        Tagdef::new(local_name!("i"), &[]),
        Tagdef::new(local_name!("kbd"), &[]),
        Tagdef::new(local_name!("li"), &[]),
        Tagdef::new(local_name!("ol"), &[]),
        Tagdef::new(local_name!("p"), &[]),
        Tagdef::new(local_name!("pre"), &[]),
        Tagdef::new(local_name!("q"), &["cite"])
            .enforce_protocols("cite", &["http", "https"]),
        Tagdef::new(local_name!("samp"), &[]),
        Tagdef::new(local_name!("small"), &[]),
        Tagdef::new(local_name!("span"), &[]),
        Tagdef::new(local_name!("strike"), &[]),
        Tagdef::new(local_name!("strong"), &[]),
        Tagdef::new(local_name!("sub"), &[]),
        Tagdef::new(local_name!("sup"), &[]),
        Tagdef::new(local_name!("u"), &[]),
        Tagdef::new(local_name!("ul"), &[]),
        Tagdef::new(local_name!("var"), &[]),
    ]
    .into_iter()
    .collect();

    /// `BASIC` plus images loaded over http or https.
    pub static ref BASIC_WITH_IMAGES: Whitelist = BASIC.clone().with(
        Tagdef::new(
            local_name!("img"),
            &["align", "alt", "height", "src", "title", "width"],
        )
        .enforce_protocols("src", &["http", "https"]),
    );
}
