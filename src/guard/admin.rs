//! Administrator recognition.
//!
//! Admin DNs are compared as distinguished names, not as patterns: attribute types
//! and values are case-insensitive and whitespace around `,` and `=` is ignored.

use std::collections::HashSet;

use crate::error::{GuardError, Result};
use crate::types::{GuardSettings, User};

/// Recognizes callers exempt from the standard authorization rules.
pub trait AdminCheck: Send + Sync {
    fn is_admin(&self, user: &User) -> bool;
}

/// Administrator recognition by the configured `admin_dn` list.
#[derive(Debug, Clone, Default)]
pub struct AdminDns {
    dns: HashSet<String>,
}

impl AdminDns {
    pub fn new<I, S>(dns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dns = dns
            .into_iter()
            .map(|dn| {
                normalize_dn(dn.as_ref()).ok_or_else(|| GuardError::InvalidConfig {
                    reason: format!("malformed admin DN '{}'", dn.as_ref()),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { dns })
    }

    pub fn from_settings(settings: &GuardSettings) -> Result<Self> {
        Self::new(&settings.admin_dn)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dns.is_empty()
    }
}

impl AdminCheck for AdminDns {
    fn is_admin(&self, user: &User) -> bool {
        if self.dns.is_empty() {
            return false;
        }
        normalize_dn(&user.name).is_some_and(|dn| self.dns.contains(&dn))
    }
}

/// Canonical form of a DN, or `None` when it is blank or has an empty component.
/// A plain name without `=` is treated as a single-component DN.
fn normalize_dn(dn: &str) -> Option<String> {
    let mut parts = Vec::new();
    for rdn in split_unescaped(dn, ',') {
        let rdn = rdn.trim();
        if rdn.is_empty() {
            return None;
        }
        let part = match rdn.split_once('=') {
            Some((kind, value)) => {
                let (kind, value) = (kind.trim(), value.trim());
                if kind.is_empty() || value.is_empty() {
                    return None;
                }
                format!("{}={}", kind.to_lowercase(), value.to_lowercase())
            }
            None => rdn.to_lowercase(),
        };
        parts.push(part);
    }
    Some(parts.join(","))
}

fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (pos, ch) in input.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            c if c == separator && !escaped => {
                parts.push(&input[start..pos]);
                start = pos + c.len_utf8();
            }
            _ => escaped = false,
        }
    }
    parts.push(&input[start..]);
    parts
}
