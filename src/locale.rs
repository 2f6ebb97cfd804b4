//! Display strings for the messages the core itself produces.
//!
//! An [`I18n`] value is an immutable snapshot of one locale. Switching
//! languages yields a new snapshot; holders of the old one keep rendering in
//! the old language until they pick up the new value. Missing translations
//! fall back to English, and unknown keys render as the key itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeepsakeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Ko,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Ko];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Ko => "ko",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::En => EN,
            Locale::Es => ES,
            Locale::Ko => KO,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        // Accept region-qualified tags such as "en-US" or "ko_KR".
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code() == primary)
            .ok_or_else(|| {
                KeepsakeError::Config(format!("unsupported locale '{s}' (expected en, es or ko)"))
            })
    }
}

const EN: &[(&str, &str)] = &[
    ("list.loading", "Loading..."),
    ("list.empty", "Nothing here yet"),
    ("list.no_matches", "No matches on this page"),
    ("list.retry", "Retry"),
    ("list.page", "Page {page} of {pages}"),
    ("list.page_open", "Page {page}"),
    ("list.total", "{count} total"),
    ("list.total_at_least", "at least {count}"),
    ("banner.auth", "Please sign in again"),
    ("banner.network", "Could not reach the server"),
    ("banner.server", "The server reported an error"),
    ("banner.not_found", "That item no longer exists"),
    ("form.create", "Create"),
    ("form.save", "Save"),
    ("form.cancel", "Cancel"),
    ("form.unchanged", "No changes to save"),
    ("upload.done", "Uploaded"),
    ("upload.failed", "Failed"),
    ("confirm.delete", "Delete this item?"),
];

const ES: &[(&str, &str)] = &[
    ("list.loading", "Cargando..."),
    ("list.empty", "Todavía no hay nada"),
    ("list.no_matches", "Sin coincidencias en esta página"),
    ("list.retry", "Reintentar"),
    ("list.page", "Página {page} de {pages}"),
    ("list.page_open", "Página {page}"),
    ("list.total", "{count} en total"),
    ("list.total_at_least", "al menos {count}"),
    ("banner.auth", "Vuelve a iniciar sesión"),
    ("banner.network", "No se pudo conectar con el servidor"),
    ("banner.server", "El servidor informó un error"),
    ("banner.not_found", "Ese elemento ya no existe"),
    ("form.create", "Crear"),
    ("form.save", "Guardar"),
    ("form.cancel", "Cancelar"),
    ("form.unchanged", "No hay cambios que guardar"),
    ("upload.done", "Subido"),
    ("upload.failed", "Falló"),
];

const KO: &[(&str, &str)] = &[
    ("list.loading", "불러오는 중..."),
    ("list.empty", "아직 항목이 없습니다"),
    ("list.retry", "다시 시도"),
    ("list.page", "{pages}페이지 중 {page}페이지"),
    ("list.page_open", "{page}페이지"),
    ("list.total", "총 {count}개"),
    ("list.total_at_least", "최소 {count}개"),
    ("banner.auth", "다시 로그인해 주세요"),
    ("banner.network", "서버에 연결할 수 없습니다"),
    ("form.create", "만들기"),
    ("form.save", "저장"),
    ("form.cancel", "취소"),
];

/// Immutable translation snapshot for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I18n {
    locale: Locale,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl I18n {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// A snapshot for `locale`. `self` is left as it was.
    #[must_use]
    pub fn set_locale(&self, locale: Locale) -> I18n {
        I18n::new(locale)
    }

    pub fn t(&self, key: &'static str) -> &'static str {
        lookup(self.locale.table(), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    /// Translate `key` and substitute `{name}` placeholders.
    pub fn format(&self, key: &'static str, args: &[(&str, &dyn fmt::Display)]) -> String {
        let mut text = self.t(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), &value.to_string());
        }
        text
    }

    /// Pagination footer, one-based. The page count is left out when the
    /// collection size is unknown.
    pub fn page_label(&self, page: u32, page_count: Option<u64>) -> String {
        match page_count {
            Some(count) => self.format(
                "list.page",
                &[("page", &(page + 1)), ("pages", &count.max(1))],
            ),
            None => self.format("list.page_open", &[("page", &(page + 1))]),
        }
    }
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_locale_returns_new_snapshot() {
        let english = I18n::default();
        let korean = english.set_locale(Locale::Ko);
        assert_eq!(english.locale(), Locale::En);
        assert_eq!(english.t("form.save"), "Save");
        assert_eq!(korean.t("form.save"), "저장");
    }

    #[test]
    fn test_fallbacks() {
        let korean = I18n::new(Locale::Ko);
        assert_eq!(korean.t("upload.failed"), "Failed");
        assert_eq!(korean.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_page_label() {
        let i18n = I18n::default();
        assert_eq!(i18n.page_label(1, Some(2)), "Page 2 of 2");
        assert_eq!(i18n.page_label(0, Some(0)), "Page 1 of 1");
        assert_eq!(i18n.page_label(4, None), "Page 5");
        assert_eq!(
            i18n.set_locale(Locale::Es).page_label(0, Some(3)),
            "Página 1 de 3"
        );
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ko_KR".parse::<Locale>().unwrap(), Locale::Ko);
        assert!("fr".parse::<Locale>().is_err());
    }
}
