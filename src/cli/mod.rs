pub mod absorb;
pub mod complete;
pub mod inspect;
pub mod list;

use std::path::Path;

use crate::parser::KeywordRules;
use crate::Result;

/// Load keyword rules from `--rules`, falling back to the defaults.
pub(crate) fn load_rules(path: Option<&Path>) -> Result<KeywordRules> {
    match path {
        Some(path) => KeywordRules::from_toml_file(path),
        None => Ok(KeywordRules::default()),
    }
}
