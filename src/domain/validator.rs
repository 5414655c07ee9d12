//! Domain name validation and keyword normalization

use crate::error::{Result, SeoForgeError};
use crate::validation_error;
use regex::Regex;

/// Closest ASCII spelling for letters outside `[a-z0-9]`.
fn fold_to_ascii(c: char) -> Option<&'static str> {
    let folded = match c {
        'ğ' => "g",
        'ü' | 'ù' | 'ú' | 'û' | 'ū' => "u",
        'ş' | 'š' | 'ś' => "s",
        'ı' | 'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ō' => "o",
        'ç' | 'č' | 'ć' => "c",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
        'ñ' | 'ń' => "n",
        'ý' | 'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        'ł' => "l",
        'ř' => "r",
        'đ' => "d",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    };
    Some(folded)
}

/// Normalize a keyword into a domain stem: lower-case, locale letters folded
/// to ASCII, everything outside `[a-z0-9]` dropped.
///
/// Pure and idempotent: the output only ever contains `[a-z0-9]`.
pub fn normalize_keyword(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if let Some(folded) = fold_to_ascii(c) {
            out.push_str(folded);
        }
    }
    out
}

/// Stem and extension of a domain name ("altin.com.tr" -> "altin", "com.tr")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    pub stem: String,
    pub extension: String,
}

/// Split on the first dot. A name without a dot is all stem.
pub fn split_domain(domain: &str) -> DomainParts {
    let domain = domain.trim().to_lowercase();
    match domain.split_once('.') {
        Some((stem, extension)) => DomainParts {
            stem: stem.to_string(),
            extension: extension.to_string(),
        },
        None => DomainParts {
            stem: domain,
            extension: String::new(),
        },
    }
}

/// Domain name validator
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainValidator;

impl DomainValidator {
    /// Create a new domain validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a domain name
    pub fn validate(&self, domain: &str) -> Result<ValidatedDomain> {
        let domain = domain.trim().to_lowercase();

        self.validate_format(&domain)?;
        self.validate_length(&domain)?;

        let valid_chars = Regex::new(r"^[a-z0-9.-]+$")
            .map_err(|e| SeoForgeError::internal(e.to_string()))?;

        if !valid_chars.is_match(&domain) {
            return Err(SeoForgeError::validation("Domain contains invalid characters"));
        }

        let parts = split_domain(&domain);
        if parts.extension.is_empty() {
            return Err(SeoForgeError::validation("Domain must have at least one dot"));
        }
        self.validate_stem(&parts.stem)?;
        self.validate_extension(&parts.extension)?;

        Ok(ValidatedDomain {
            stem: parts.stem,
            extension: parts.extension,
            full_domain: domain,
        })
    }

    fn validate_format(&self, domain: &str) -> Result<()> {
        if domain.is_empty() {
            return Err(SeoForgeError::validation("Domain name cannot be empty"));
        }

        if domain.starts_with('-') || domain.ends_with('-') {
            return Err(SeoForgeError::validation("Domain cannot start or end with hyphen"));
        }

        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(SeoForgeError::validation("Domain cannot start or end with dot"));
        }

        if domain.contains("..") {
            return Err(SeoForgeError::validation("Domain cannot contain consecutive dots"));
        }

        Ok(())
    }

    fn validate_length(&self, domain: &str) -> Result<()> {
        if domain.len() > 253 {
            return Err(SeoForgeError::validation("Domain name too long (max 253 characters)"));
        }

        if domain.len() < 3 {
            return Err(SeoForgeError::validation("Domain name too short (min 3 characters)"));
        }

        Ok(())
    }

    fn validate_stem(&self, stem: &str) -> Result<()> {
        if stem.is_empty() {
            return Err(SeoForgeError::validation("Domain name part cannot be empty"));
        }

        if stem.len() > 63 {
            return Err(SeoForgeError::validation("Domain label too long (max 63 characters)"));
        }

        if stem.starts_with('-') || stem.ends_with('-') {
            return Err(SeoForgeError::validation("Domain label cannot start or end with hyphen"));
        }

        Ok(())
    }

    fn validate_extension(&self, extension: &str) -> Result<()> {
        let label_regex = Regex::new(r"^[a-z]{2,63}$")
            .map_err(|e| SeoForgeError::internal(e.to_string()))?;

        // "com.tr" is two labels, each must look like a TLD label
        for label in extension.split('.') {
            if !label_regex.is_match(label) {
                return Err(validation_error!("Invalid extension format: {}", extension));
            }
        }

        Ok(())
    }
}

/// Domain validation result
#[derive(Debug, Clone)]
pub struct ValidatedDomain {
    pub stem: String,
    pub extension: String,
    pub full_domain: String,
}

impl ValidatedDomain {
    /// Get the full domain name
    pub fn get_full_domain(&self) -> String {
        self.full_domain.clone()
    }

    /// Last label of the extension ("com.tr" -> "tr")
    pub fn tld(&self) -> &str {
        self.extension.rsplit('.').next().unwrap_or(&self.extension)
    }
}
