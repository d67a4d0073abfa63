use html5ever::LocalName;

use std::collections::HashSet;

lazy_static! {
    /// Structural wrappers whose children are kept when the wrapper itself is removed, whether
    /// or not the cleaner preserves children.
    pub static ref ALWAYS_PRESERVE_CHILDREN: HashSet<LocalName> = hashset! {
        local_name!("html"),
        local_name!("body"),
    };
    /// Elements whose contents are never hoisted into the parent: their contents are not
    /// rendered as text, or are unsafe to render outside of them.
    pub static ref ALWAYS_DELETE_CHILDREN: HashSet<LocalName> = hashset! {
        local_name!("applet"),
        local_name!("area"),
        local_name!("audio"),
        local_name!("base"),
        local_name!("basefont"),
        local_name!("br"),
        local_name!("canvas"),
        local_name!("col"),
        local_name!("colgroup"),
        LocalName::from("datalist"),
        local_name!("embed"),
        local_name!("frame"),
        local_name!("frameset"),
        local_name!("head"),
        local_name!("hr"),
        local_name!("iframe"),
        local_name!("img"),
        local_name!("input"),
        local_name!("keygen"),
        local_name!("link"),
        local_name!("map"),
        local_name!("menu"),
        local_name!("meta"),
        local_name!("noframes"),
        local_name!("noscript"),
        local_name!("object"),
        local_name!("param"),
        LocalName::from("progress"),
        local_name!("rp"),
        local_name!("script"),
        local_name!("source"),
        local_name!("style"),
        local_name!("textarea"),
        local_name!("track"),
        local_name!("video"),
        local_name!("wbr"),
    };
}
