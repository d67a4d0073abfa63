use crate::whitelist::{Tagdef, Whitelist};

lazy_static! {
    /// Inline text formatting only.
    pub static ref SIMPLE_TEXT: Whitelist = vec![
        Tagdef::new(local_name!("b"), &[]),
        Tagdef::new(local_name!("em"), &[]),
        Tagdef::new(local_name!("i"), &[]),
        Tagdef::new(local_name!("strong"), &[]),
        Tagdef::new(local_name!("u"), &[]),
    ]
    .into_iter()
    .collect();
}
