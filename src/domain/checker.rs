//! Network-backed availability and WHOIS probe

use crate::domain::validator::ValidatedDomain;
use crate::domain::{AvailabilityProbe, DomainValidator, WhoisProbe};
use crate::error::{Result, SeoForgeError};
use crate::types::{AvailabilityReport, AvailabilityStatus, WhoisRecord};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// DNS first, WHOIS second
pub struct NetworkProbe {
    timeout: Duration,
    validator: DomainValidator,
    #[cfg(feature = "whois")]
    whois_client: WhoisClient,
}

impl NetworkProbe {
    /// Create a probe with the default 10s time box per lookup
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            validator: DomainValidator::new(),
            #[cfg(feature = "whois")]
            whois_client: WhoisClient::new(timeout),
        }
    }

    /// Whether the name resolves to at least one address
    async fn resolves(&self, domain: &str) -> Result<bool> {
        let target = format!("{}:80", domain);
        let addrs = timeout(self.timeout, tokio::net::lookup_host(target))
            .await
            .map_err(|_| SeoForgeError::timeout("DNS lookup", self.timeout.as_secs()))?
            .map_err(|e| SeoForgeError::probe_unavailable(domain, e.to_string(), Some("dns".to_string())))?;

        Ok(addrs.count() > 0)
    }

    #[cfg(feature = "whois")]
    async fn whois_lookup(&self, domain: &ValidatedDomain) -> Result<WhoisRecord> {
        self.whois_client.lookup(&domain.full_domain, domain.tld()).await
    }

    #[cfg(not(feature = "whois"))]
    async fn whois_lookup(&self, domain: &ValidatedDomain) -> Result<WhoisRecord> {
        Err(SeoForgeError::probe_unavailable(
            domain.get_full_domain(),
            "WHOIS support not compiled in",
            Some("whois".to_string()),
        ))
    }
}

impl Default for NetworkProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvailabilityProbe for NetworkProbe {
    async fn probe(&self, domain: &str) -> Result<AvailabilityReport> {
        let validated = self.validator.validate(domain)?;
        let domain = validated.get_full_domain();
        let start_time = Instant::now();

        match self.resolves(&domain).await {
            Ok(true) => {
                tracing::debug!(
                    domain = %domain,
                    method = "dns",
                    duration_ms = %start_time.elapsed().as_millis(),
                    "Domain resolves"
                );
                return Ok(AvailabilityReport::new(AvailabilityStatus::Registered, "domain resolves"));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(domain = %domain, method = "dns", error = %e, "DNS lookup failed");
            }
        }

        let report = match self.whois_lookup(&validated).await {
            Ok(record) if record.registered => {
                AvailabilityReport::new(AvailabilityStatus::Registered, "registry lists the domain")
            }
            Ok(_) => AvailabilityReport::new(AvailabilityStatus::Available, "registry has no record"),
            Err(e) if e.suggests_available() => {
                AvailabilityReport::new(AvailabilityStatus::Available, "registry has no record")
            }
            Err(e) => {
                tracing::debug!(domain = %domain, method = "whois", error = %e, "WHOIS lookup failed");
                AvailabilityReport::new(
                    AvailabilityStatus::Unknown,
                    "lookup failed; domain may be available",
                )
            }
        };

        tracing::debug!(
            domain = %domain,
            status = %report.status,
            duration_ms = %start_time.elapsed().as_millis(),
            "Availability probe completed"
        );

        Ok(report)
    }

    fn name(&self) -> &str {
        "network"
    }
}

#[async_trait]
impl WhoisProbe for NetworkProbe {
    async fn whois(&self, domain: &str) -> Result<WhoisRecord> {
        let validated = self.validator.validate(domain)?;
        self.whois_lookup(&validated).await
    }
}

/// WHOIS client over TCP/43 (optional feature)
#[cfg(feature = "whois")]
struct WhoisClient {
    timeout: Duration,
}

#[cfg(feature = "whois")]
impl WhoisClient {
    const IANA_SERVER: &'static str = "whois.iana.org";

    fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn lookup(&self, domain: &str, tld: &str) -> Result<WhoisRecord> {
        // Unknown TLDs ask IANA for the authoritative server first
        let server = match whois_server_for_tld(tld) {
            Some(server) => server.to_string(),
            None => {
                let iana = self.query(Self::IANA_SERVER, tld).await?;
                parse_iana_field(&iana, "whois")
                    .or_else(|| parse_iana_field(&iana, "refer"))
                    .ok_or_else(|| {
                        SeoForgeError::probe_unavailable(
                            domain,
                            format!("No WHOIS server found for TLD: {}", tld),
                            Some("whois".to_string()),
                        )
                    })?
            }
        };

        let raw = self.query(&server, domain).await?;
        parse_whois_response(&raw, domain)
    }

    async fn query(&self, server: &str, query: &str) -> Result<String> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpStream;

        let secs = self.timeout.as_secs();
        let addr = format!("{}:43", server);
        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SeoForgeError::timeout("WHOIS connect", secs))?
            .map_err(|e| SeoForgeError::network(format!("WHOIS connect failed: {}", e), None, Some(addr.clone())))?;

        timeout(self.timeout, stream.write_all(format!("{}\r\n", query).as_bytes()))
            .await
            .map_err(|_| SeoForgeError::timeout("WHOIS write", secs))?
            .map_err(|e| SeoForgeError::network(format!("WHOIS write failed: {}", e), None, Some(addr.clone())))?;

        let mut buf = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut buf))
            .await
            .map_err(|_| SeoForgeError::timeout("WHOIS read", secs))?
            .map_err(|e| SeoForgeError::network(format!("WHOIS read failed: {}", e), None, Some(addr)))?;

        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

fn whois_server_for_tld(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "info" => Some("whois.nic.info"),
        "biz" => Some("whois.nic.biz"),
        "tr" => Some("whois.nic.tr"),
        "io" => Some("whois.nic.io"),
        "co" => Some("whois.nic.co"),
        _ => None,
    }
}

/// Turn raw WHOIS text into a record; `Err` when it says neither way
fn parse_whois_response(output: &str, domain: &str) -> Result<WhoisRecord> {
    let output_lower = output.to_lowercase();

    let available_patterns = [
        "no match",
        "not found",
        "no entries found",
        "domain not found",
        "not registered",
        "available for registration",
    ];

    let registered_patterns = [
        "registrar:",
        "creation date:",
        "created on",
        "created:",
        "registered:",
        "name server:",
        "nameserver:",
        "domain status:",
    ];

    let is_available = available_patterns.iter().any(|p| output_lower.contains(p));
    let is_registered = registered_patterns.iter().any(|p| output_lower.contains(p));

    if is_available && !is_registered {
        return Ok(WhoisRecord::default());
    }

    if !is_registered {
        return Err(SeoForgeError::probe_unavailable(
            domain,
            "Unrecognised WHOIS response",
            Some("whois".to_string()),
        ));
    }

    Ok(WhoisRecord {
        registered: true,
        registrar: extract_field(output, &["registrar:", "registrar name:", "organization name"]),
        creation_date: extract_field(output, &["creation date:", "created on", "created:", "registered:"])
            .and_then(|s| parse_date(&s)),
        expiration_date: extract_field(output, &["registry expiry date:", "expiration date:", "expires on", "expires:", "expiry date:"])
            .and_then(|s| parse_date(&s)),
    })
}

/// Value after the first `:` of the first line containing any pattern
fn extract_field(output: &str, patterns: &[&str]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        output
            .lines()
            .find(|line| line.to_lowercase().contains(pattern))
            .and_then(|line| line.split_once(':'))
            .map(|(_, value)| value.trim().trim_end_matches('.').trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%d %H:%M:%S UTC", "%Y-%m-%d %H:%M:%S"];
    for format in &datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive.and_utc());
        }
    }

    // nic.tr writes "2001-Jan-05"
    let date_formats = ["%Y-%m-%d", "%Y-%b-%d", "%d-%b-%Y", "%d.%m.%Y"];
    for format in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

fn parse_iana_field(iana: &str, key: &str) -> Option<String> {
    iana.lines()
        .map(str::trim)
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(key)
                .then(|| value.trim().to_string())
        })
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const VERISIGN_SAMPLE: &str = r#"
   Domain Name: BITCOIN.COM
   Registry Domain ID: 1234_DOMAIN_COM-VRSN
   Registrar WHOIS Server: whois.example-registrar.com
   Updated Date: 2023-04-01T10:00:00Z
   Creation Date: 1998-05-13T04:00:00Z
   Registry Expiry Date: 2030-05-12T04:00:00Z
   Registrar: Example Registrar, LLC
   Name Server: NS1.EXAMPLE.COM
"#;

    const NIC_TR_SAMPLE: &str = r#"
** Domain Name: altin.com.tr
** Registrant:
   Example Holding A.S.
** Registrar:
NIC Handle		: abc1-metu
Organization Name	: Example Bilisim
** Additional Info:
Created on..............: 2001-Jan-05.
Expires on..............: 2031-Jan-04.
"#;

    #[test]
    fn test_parse_verisign_response() {
        let record = parse_whois_response(VERISIGN_SAMPLE, "bitcoin.com").unwrap();
        assert!(record.registered);
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar, LLC"));
        assert_eq!(record.creation_date.unwrap().year(), 1998);
        assert_eq!(record.expiration_date.unwrap().year(), 2030);
    }

    #[test]
    fn test_parse_nic_tr_response() {
        let record = parse_whois_response(NIC_TR_SAMPLE, "altin.com.tr").unwrap();
        assert!(record.registered);
        let created = record.creation_date.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2001, 1, 5));
        assert_eq!(record.expiration_date.unwrap().year(), 2031);
    }

    #[test]
    fn test_parse_no_match() {
        let record = parse_whois_response("No match for \"QWZXALTIN.COM\".\r\n", "qwzxaltin.com").unwrap();
        assert!(!record.registered);
        assert!(record.creation_date.is_none());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_whois_response("rate limit exceeded", "altin.com").unwrap_err();
        assert!(err.is_probe_failure());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2020-02-03").is_some());
        assert!(parse_date("2020-02-03T01:02:03Z").is_some());
        assert!(parse_date("2020-02-03 01:02:03 UTC").is_some());
        assert!(parse_date("03-Feb-2020").is_some());
        assert!(parse_date("2020-Feb-03").is_some());
        assert!(parse_date("soon").is_none());
    }

    #[test]
    fn test_iana_parsing() {
        let sample = r#"
domain:       COM
organisation: Verisign Global Registry Services
whois:        whois.verisign-grs.com
status:       ACTIVE
"#;
        assert_eq!(parse_iana_field(sample, "whois").as_deref(), Some("whois.verisign-grs.com"));
        assert_eq!(
            parse_iana_field("refer: whois.nic.io\n", "refer").as_deref(),
            Some("whois.nic.io")
        );
        assert!(parse_iana_field(sample, "refer").is_none());
    }

    #[test]
    fn test_whois_servers() {
        assert_eq!(whois_server_for_tld("tr"), Some("whois.nic.tr"));
        assert_eq!(whois_server_for_tld("com"), Some("whois.verisign-grs.com"));
        assert!(whois_server_for_tld("zz").is_none());
    }

    #[tokio::test]
    async fn test_probe_rejects_invalid_domain() {
        let probe = NetworkProbe::with_timeout(Duration::from_millis(50));
        let err = probe.probe("not a domain").await.unwrap_err();
        assert!(matches!(err, SeoForgeError::Validation { .. }));
    }
}
