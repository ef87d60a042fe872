use std::fmt;
use std::str::FromStr;

use crate::block::kv::{self, OptionsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
        };
        f.write_str(name)
    }
}

/// Options for the HttpRequest block: one outgoing request of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestOptions {
    pub method: HttpMethod,
    pub url: String,
    /// Header lines in source order, split on the first `:`.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout_ms: u64,
    pub follow_redirects: bool,
}

impl Default for HttpRequestOptions {
    fn default() -> Self {
        HttpRequestOptions {
            method: HttpMethod::default(),
            url: String::new(),
            headers: Vec::new(),
            body: None,
            timeout_ms: 10_000,
            follow_redirects: true,
        }
    }
}

impl HttpRequestOptions {
    pub fn read_script(&mut self, payload: &str) -> Result<(), OptionsError> {
        for entry in kv::parse_entries(payload)? {
            match entry.key.as_str() {
                "method" => {
                    let text = entry.str_value()?;
                    self.method = text
                        .parse()
                        .map_err(|_| entry.err(format!("unknown http method: {}", text)))?;
                }
                "url" => self.url = entry.str_value()?.to_string(),
                "header" => {
                    let text = entry.str_value()?;
                    let Some((name, value)) = text.split_once(':') else {
                        return Err(entry.err("header expects \"Name: Value\""));
                    };
                    self.headers
                        .push((name.trim().to_string(), value.trim().to_string()));
                }
                "body" => self.body = Some(entry.str_value()?.to_string()),
                "timeout" => {
                    let n = entry.int_value()?;
                    if n < 0 {
                        return Err(entry.err("timeout must not be negative"));
                    }
                    self.timeout_ms = n as u64;
                }
                "follow_redirects" => self.follow_redirects = entry.bool_value()?,
                _ => return Err(entry.unknown_key()),
            }
        }
        Ok(())
    }

    pub fn write_script(&self, out: &mut String) {
        out.push_str(&format!("method = {}\n", self.method));
        out.push_str(&format!("url = {}\n", kv::quote(&self.url)));
        for (name, value) in &self.headers {
            out.push_str(&format!(
                "header = {}\n",
                kv::quote(&format!("{}: {}", name, value))
            ));
        }
        if let Some(body) = &self.body {
            out.push_str(&format!("body = {}\n", kv::quote(body)));
        }
        out.push_str(&format!("timeout = {}\n", self.timeout_ms));
        out.push_str(&format!("follow_redirects = {}\n", self.follow_redirects));
    }
}
