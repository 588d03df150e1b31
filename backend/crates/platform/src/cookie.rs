//! `Set-Cookie` rendering and `Cookie` lookup
//!
//! Attribute order is fixed (`HttpOnly; Secure; SameSite; Path; Max-Age`)
//! so headers can be compared as plain strings.

use std::fmt::Write;

use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Name and attributes of one cookie; the value is supplied per response
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<u64>,
}

impl CookieConfig {
    /// `HttpOnly; Secure; SameSite=Lax; Path=/`, no `Max-Age`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: true,
            http_only: true,
            same_site: SameSite::default(),
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    pub fn with_secure(self, secure: bool) -> Self {
        Self { secure, ..self }
    }

    pub fn with_same_site(self, same_site: SameSite) -> Self {
        Self { same_site, ..self }
    }

    pub fn with_max_age(self, secs: u64) -> Self {
        Self {
            max_age_secs: Some(secs),
            ..self
        }
    }

    pub fn build_set_cookie(&self, value: &str) -> String {
        self.render(value, self.max_age_secs)
    }

    /// Same name and scope with an empty value and `Max-Age=0`
    pub fn build_delete_cookie(&self) -> String {
        self.render("", Some(0))
    }

    fn render(&self, value: &str, max_age: Option<u64>) -> String {
        let mut out = format!("{}={}", self.name, value);
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        // Writing into a String cannot fail
        let _ = write!(out, "; SameSite={}; Path={}", self.same_site.as_str(), self.path);
        if let Some(secs) = max_age {
            let _ = write!(out, "; Max-Age={secs}");
        }
        out
    }
}

/// First non-empty value of cookie `name` across all `Cookie` headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
