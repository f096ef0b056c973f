//! `.properties` 资源包目录
//!
//! 从目录加载 `<bundle>.properties` 与 `<bundle>_<locale>.properties`，
//! 作为平台基础查找的进程内实现。查找时按语言栈逐级回退，基础文件对应 `default`。

use std::collections::HashMap;
use std::path::Path;

use super::context::{LocaleStack, DEFAULT_LOCALE};
use super::error::{helpers, ResourceResult};
use super::source::BaseLookup;

const PROPERTIES_EXTENSION: &str = "properties";

type Messages = HashMap<String, String>;

/// 资源包目录：bundle -> locale -> key -> message
#[derive(Debug, Default, Clone)]
pub struct PropertiesCatalog {
    bundles: HashMap<String, HashMap<String, Messages>>,
}

impl PropertiesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载目录下所有 `.properties` 文件（不递归）
    pub fn load_dir(dir: &Path) -> ResourceResult<Self> {
        let mut catalog = Self::new();
        let mut files = 0usize;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROPERTIES_EXTENSION) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let (bundle, locale) = split_bundle_name(stem);
            let content = std::fs::read_to_string(&path)?;
            let messages = parse_properties(&content)
                .map_err(|e| e.with_context(path.display()))?;

            tracing::debug!(
                "加载资源包 {} ({}): {} 条消息",
                bundle,
                locale,
                messages.len()
            );
            catalog.extend(bundle, locale, messages);
            files += 1;
        }

        tracing::info!("已从 {} 加载 {} 个资源文件", dir.display(), files);
        Ok(catalog)
    }

    /// 加入单条消息
    pub fn insert(&mut self, bundle: &str, locale: &str, key: &str, message: &str) {
        self.locale_messages(bundle, locale)
            .insert(key.to_string(), message.to_string());
    }

    /// 合并一组消息，已有的键会被覆盖
    pub fn extend(&mut self, bundle: &str, locale: &str, messages: Messages) {
        self.locale_messages(bundle, locale).extend(messages);
    }

    pub fn bundle_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 精确查找，不做语言回退
    pub fn get_exact(&self, bundle: &str, locale: &str, key: &str) -> Option<&str> {
        self.bundles
            .get(bundle)?
            .get(locale)?
            .get(key)
            .map(String::as_str)
    }

    fn locale_messages(&mut self, bundle: &str, locale: &str) -> &mut Messages {
        self.bundles
            .entry(bundle.to_string())
            .or_default()
            .entry(locale.to_string())
            .or_default()
    }
}

impl BaseLookup for PropertiesCatalog {
    fn find(&self, key: &str, bundle: &str, locale: &str) -> Option<String> {
        let locales = self.bundles.get(bundle)?;

        LocaleStack::for_locale(locale)
            .iter()
            .find_map(|candidate| locales.get(candidate)?.get(key))
            .cloned()
    }
}

/// 拆分文件名为资源包名和语言，例如 `checkout_de_DE` -> (`checkout`, `de_DE`)
///
/// 无语言后缀时语言为 `default`。资源包名本身可以带下划线，如 `co_message`。
pub fn split_bundle_name(stem: &str) -> (&str, &str) {
    let parts: Vec<&str> = stem.split('_').collect();
    let n = parts.len();

    if n >= 3 && is_language(parts[n - 2]) && is_region(parts[n - 1]) {
        let split = stem.len() - parts[n - 2].len() - parts[n - 1].len() - 2;
        return (&stem[..split], &stem[split + 1..]);
    }

    if n >= 2 && is_language(parts[n - 1]) {
        let split = stem.len() - parts[n - 1].len() - 1;
        return (&stem[..split], &stem[split + 1..]);
    }

    (stem, DEFAULT_LOCALE)
}

fn is_language(part: &str) -> bool {
    (2..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_lowercase())
}

fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// 解析 Java `.properties` 文本
pub fn parse_properties(content: &str) -> ResourceResult<Messages> {
    let mut messages = Messages::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key).map_err(|e| e.with_context(format!("第 {} 行", index + 1)))?;
        let value =
            unescape(raw_value).map_err(|e| e.with_context(format!("第 {} 行", index + 1)))?;
        messages.insert(key, value);
    }

    Ok(messages)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\x0c']);
    }

    (key, rest)
}

fn unescape(raw: &str) -> ResourceResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| helpers::parse_error(format!("无效的 unicode 转义 \\u{}", hex)))?;
                out.push(code);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bundle_name() {
        assert_eq!(split_bundle_name("message"), ("message", "default"));
        assert_eq!(split_bundle_name("message_de"), ("message", "de"));
        assert_eq!(split_bundle_name("message_de_DE"), ("message", "de_DE"));
        assert_eq!(split_bundle_name("co_message"), ("co_message", "default"));
        assert_eq!(split_bundle_name("co_message_fr_FR"), ("co_message", "fr_FR"));
        assert_eq!(split_bundle_name("checkout_es_419"), ("checkout", "es_419"));
    }

    #[test]
    fn test_parse_separators_and_comments() {
        let messages = parse_properties(
            "# comment\n! also comment\n\nlabel.a=Alpha\nlabel.b : Beta\nlabel.c Gamma\nlabel.empty=\n",
        )
        .unwrap();

        assert_eq!(messages["label.a"], "Alpha");
        assert_eq!(messages["label.b"], "Beta");
        assert_eq!(messages["label.c"], "Gamma");
        assert_eq!(messages["label.empty"], "");
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_parse_continuation_and_escapes() {
        let messages = parse_properties(
            "long=first \\\n    second\nescaped\\=key=value\nunicode=Gr\\u00fc\\u00dfe\ntabs=a\\tb\n",
        )
        .unwrap();

        assert_eq!(messages["long"], "first second");
        assert_eq!(messages["escaped=key"], "value");
        assert_eq!(messages["unicode"], "Grüße");
        assert_eq!(messages["tabs"], "a\tb");
    }

    #[test]
    fn test_invalid_unicode_escape() {
        let err = parse_properties("bad=\\u12G4\n").unwrap_err();
        assert!(err.to_string().contains("第 1 行"));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("message.properties"), "title=Title\n").unwrap();
        std::fs::write(dir.path().join("message_de_DE.properties"), "title=Titel\n").unwrap();
        std::fs::write(dir.path().join("co_checkout.properties"), "button=Kaufen\n").unwrap();
        std::fs::write(dir.path().join("readme.md"), "skip").unwrap();

        let catalog = PropertiesCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.bundle_names(), vec!["co_checkout", "message"]);
        assert_eq!(catalog.get_exact("message", "de_DE", "title"), Some("Titel"));
        assert_eq!(catalog.get_exact("message", "de", "title"), None);
        assert_eq!(catalog.get_exact("co_checkout", "default", "button"), Some("Kaufen"));
    }

    #[test]
    fn test_find_walks_locale_stack() {
        let mut catalog = PropertiesCatalog::new();
        catalog.insert("message", "default", "title", "Title");
        catalog.insert("message", "de", "title", "Titel");
        catalog.insert("message", "default", "only.default", "Default");

        assert_eq!(catalog.find("title", "message", "de_DE"), Some("Titel".to_string()));
        assert_eq!(catalog.find("title", "message", "fr_FR"), Some("Title".to_string()));
        assert_eq!(
            catalog.find("only.default", "message", "de_DE"),
            Some("Default".to_string())
        );
        assert_eq!(catalog.find("title", "checkout", "de_DE"), None);
    }
}
