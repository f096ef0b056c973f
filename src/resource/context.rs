//! 请求上下文与语言回退栈

use serde::{Deserialize, Serialize};

/// 语言栈末尾的兜底语言
pub const DEFAULT_LOCALE: &str = "default";

/// 当前请求的站点与语言
///
/// 每次解析都显式传入，参与缓存键和映射键的构造。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestContext {
    pub site_id: String,
    pub locale: String,
}

impl RequestContext {
    pub fn new(site_id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            locale: locale.into(),
        }
    }

    /// 当前语言对应的回退栈
    pub fn locale_stack(&self) -> LocaleStack {
        LocaleStack::for_locale(&self.locale)
    }
}

/// 从具体到宽泛的语言序列，例如 `de_DE` -> `[de_DE, de, default]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleStack {
    locales: Vec<String>,
}

impl LocaleStack {
    pub fn for_locale(locale: &str) -> Self {
        let mut locales = Vec::with_capacity(3);

        if locale != DEFAULT_LOCALE && !locale.is_empty() {
            locales.push(locale.to_string());

            let mut parts = locale.split('_');
            if let (Some(language), Some(_)) = (parts.next(), parts.next()) {
                if !language.is_empty() {
                    locales.push(language.to_string());
                }
            }
        }

        locales.push(DEFAULT_LOCALE.to_string());
        Self { locales }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocaleStack {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.locales.iter()
    }
}
