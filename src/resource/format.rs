//! 位置参数格式化
//!
//! 支持 `{0}`、`{1,number}` 这类占位符，按下标替换为参数。

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_regex() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{(\d+)(?:,[^{}]*)?\}").ok())
        .as_ref()
}

/// 用参数替换消息模板中的占位符
///
/// 超出参数范围的占位符原样保留，`''` 还原为单引号。
pub fn format_message<S: AsRef<str>>(pattern: &str, args: &[S]) -> String {
    let Some(regex) = placeholder_regex() else {
        return pattern.replace("''", "'");
    };

    let replaced = regex.replace_all(pattern, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| args.get(index))
            .map(|arg| arg.as_ref().to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    replaced.replace("''", "'")
}

/// 参数序列化为缓存键片段，无参数时为空
pub fn args_segment<S: AsRef<str>>(args: &[S]) -> String {
    if args.is_empty() {
        return String::new();
    }

    let joined: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    format!(".{}", joined.join("."))
}
