//! Cookie jar shared by every request.
//!
//! The server issues `adminToken` via `Set-Cookie` on login; the jar records
//! it, sends all cookies back on later requests, and the client turns the
//! token into a bearer header.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use careadmin_auth::StorageError;

/// Cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "adminToken";

pub trait CookieStore: Send + Sync {
    /// Value of `name`, if present and non-empty.
    fn get(&self, name: &str) -> Option<String>;

    /// `Cookie` request header for everything in the store.
    fn header(&self) -> Option<String>;

    /// Apply one `Set-Cookie` response header.
    fn record_set_cookie(&self, set_cookie: &str);

    fn clear(&self);
}

/// Look up `name` in a `Cookie` header (`a=1; b=2`).
///
/// Returns `None` when the cookie is absent or appears more than once.
pub fn cookie_from_header(header: &str, name: &str) -> Option<String> {
    let padded = format!("; {header}");
    let needle = format!("; {name}=");
    let mut parts = padded.split(needle.as_str());
    let _before = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    value.split(';').next().map(str::to_string)
}

/// What a `Set-Cookie` header asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CookieUpdate {
    Set(String, String),
    Remove(String),
}

fn parse_set_cookie(raw: &str) -> Option<CookieUpdate> {
    let mut attrs = raw.split(';').map(str::trim);
    let (name, value) = attrs.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let expired = attrs.any(|attr| {
        let Some((key, val)) = attr.split_once('=') else {
            return false;
        };
        key.trim().eq_ignore_ascii_case("max-age") && val.trim().parse::<i64>().is_ok_and(|n| n <= 0)
    });

    if expired || value.is_empty() {
        Some(CookieUpdate::Remove(name.to_string()))
    } else {
        Some(CookieUpdate::Set(name.to_string(), value.to_string()))
    }
}

/// Name → value jar, optionally persisted as a JSON file.
#[derive(Debug, Default)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or start) a jar persisted at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cookies = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self {
            path: Some(path),
            cookies: Mutex::new(cookies),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set(&self, name: &str, value: &str) {
        self.update(|c| {
            c.insert(name.to_string(), value.to_string());
        });
    }

    pub fn remove(&self, name: &str) {
        self.update(|c| {
            c.remove(name);
        });
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut cookies);
        if let Err(err) = self.persist(&cookies) {
            tracing::warn!(error = %err, "could not persist cookies");
        }
    }

    fn persist(&self, cookies: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io = |source| StorageError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let body = serde_json::to_string_pretty(cookies).map_err(|source| StorageError::Corrupt {
            path: path.clone(),
            source,
        })?;
        std::fs::write(path, body).map_err(io)
    }
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let header = self.header()?;
        cookie_from_header(&header, name).filter(|v| !v.is_empty())
    }

    fn header(&self) -> Option<String> {
        let cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        if cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = cookies.iter().map(|(k, v)| format!("{k}={v}")).collect();
        Some(pairs.join("; "))
    }

    fn record_set_cookie(&self, set_cookie: &str) {
        match parse_set_cookie(set_cookie) {
            Some(CookieUpdate::Set(name, value)) => {
                tracing::debug!(cookie = %name, "cookie set by server");
                self.set(&name, &value);
            }
            Some(CookieUpdate::Remove(name)) => {
                tracing::debug!(cookie = %name, "cookie cleared by server");
                self.remove(&name);
            }
            None => tracing::debug!("ignoring malformed Set-Cookie header"),
        }
    }

    fn clear(&self) {
        self.update(BTreeMap::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cookie_by_name() {
        let h = "theme=dark; adminToken=abc.def; lang=en";
        assert_eq!(cookie_from_header(h, "adminToken").as_deref(), Some("abc.def"));
        assert_eq!(cookie_from_header(h, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_from_header(h, "missing"), None);
        assert_eq!(cookie_from_header("xadminToken=1", "adminToken"), None);
    }

    #[test]
    fn duplicate_cookie_is_ambiguous() {
        assert_eq!(cookie_from_header("adminToken=a; adminToken=b", "adminToken"), None);
    }

    #[test]
    fn set_cookie_adds_and_expires() {
        let jar = CookieJar::in_memory();
        jar.record_set_cookie("adminToken=tok123; Path=/; HttpOnly; Max-Age=86400");
        assert_eq!(jar.get(TOKEN_COOKIE).as_deref(), Some("tok123"));
        assert_eq!(jar.header().as_deref(), Some("adminToken=tok123"));

        jar.record_set_cookie("adminToken=; Path=/; Max-Age=0");
        assert_eq!(jar.get(TOKEN_COOKIE), None);
        assert_eq!(jar.header(), None);
    }

    #[test]
    fn malformed_set_cookie_is_ignored() {
        let jar = CookieJar::in_memory();
        jar.record_set_cookie("garbage");
        jar.record_set_cookie("=value");
        assert_eq!(jar.header(), None);
    }

    #[test]
    fn persisted_jar_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let jar = CookieJar::open(&path).unwrap();
        jar.set(TOKEN_COOKIE, "persisted");

        let reopened = CookieJar::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_COOKIE).as_deref(), Some("persisted"));

        reopened.clear();
        assert_eq!(CookieJar::open(&path).unwrap().header(), None);
    }
}
