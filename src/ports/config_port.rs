//! Configuration access port.
//!
//! Typed getters fall back to `default` when the key is absent and return
//! `Err(reason)` when the value is present but cannot be parsed.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, String>;
}
