//! Service-catalog parsing for the identity response.
//!
//! A successful `POST /v2.0/tokens` returns an `access` object carrying the
//! token and a catalog of named service endpoints. Only three service names
//! are consulted, via the ordered [`CATALOG_RULES`] table; everything else
//! in the catalog is ignored.

use serde::Deserialize;
use tracing::warn;

use crate::auth::Session;

/// Which session field a service-catalog entry populates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Management,
    Cdn,
}

/// Ordered service-name to session-field matching table.
///
/// Both `cloudFilesCDN` and `cloudFiles` target the CDN URL. Catalog entries
/// are applied in the order the identity service returns them, so when both
/// names are present the later catalog entry wins. That double write is
/// carried over from the upstream protocol behavior; the table is public so
/// callers can see exactly which services are consulted.
pub const CATALOG_RULES: &[(&str, EndpointKind)] = &[
    ("cloudServersOpenStack", EndpointKind::Management),
    ("cloudFilesCDN", EndpointKind::Cdn),
    ("cloudFiles", EndpointKind::Cdn),
];

#[derive(Debug, Deserialize)]
pub(crate) struct AccessResponse {
    pub access: Access,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Access {
    #[serde(rename = "serviceCatalog", default)]
    pub service_catalog: Vec<CatalogService>,
    pub token: TokenInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogService {
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Endpoint {
    #[serde(rename = "publicURL")]
    pub public_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenInfo {
    pub id: String,
}

/// Populate the session from a parsed `access` object: endpoint URLs first
/// (in catalog order), then the token
pub(crate) fn apply(access: Access, session: &mut Session) {
    for service in access.service_catalog {
        let Some(kind) = CATALOG_RULES
            .iter()
            .find_map(|&(name, kind)| (name == service.name).then_some(kind))
        else {
            continue;
        };

        let url = service
            .endpoints
            .into_iter()
            .next()
            .and_then(|e| e.public_url);
        let Some(url) = url else {
            warn!(service = %service.name, "catalog entry has no usable publicURL");
            continue;
        };

        match kind {
            EndpointKind::Management => session.set_management_url(url),
            EndpointKind::Cdn => session.set_cdn_url(url),
        }
    }

    session.set_token(access.token.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Access {
        let parsed: AccessResponse = serde_json::from_str(json).expect("valid access response");
        parsed.access
    }

    #[test]
    fn test_apply_populates_session() {
        let access = parse(
            r#"{"access":{"serviceCatalog":[
                {"name":"cloudServersOpenStack","endpoints":[{"publicURL":"https://servers.api.rackspacecloud.com/v2/123"}]},
                {"name":"cloudFilesCDN","endpoints":[{"publicURL":"https://cdn.clouddrive.com/v1/123"}]},
                {"name":"cloudDNS","endpoints":[{"publicURL":"https://dns.api.rackspacecloud.com/v1.0/123"}]}
            ],"token":{"id":"abc123"}}}"#,
        );

        let mut session = Session::new();
        apply(access, &mut session);

        assert_eq!(session.token(), Some("abc123"));
        assert_eq!(
            session.management_url(),
            Some("https://servers.api.rackspacecloud.com/v2/123")
        );
        assert_eq!(session.cdn_url(), Some("https://cdn.clouddrive.com/v1/123"));
        // cloudDNS is not in the table
        assert_eq!(session.storage_url(), None);
    }

    #[test]
    fn test_later_catalog_entry_overwrites_cdn_url() {
        let access = parse(
            r#"{"access":{"serviceCatalog":[
                {"name":"cloudFilesCDN","endpoints":[{"publicURL":"https://cdn.clouddrive.com/v1/123"}]},
                {"name":"cloudFiles","endpoints":[{"publicURL":"https://storage.clouddrive.com/v1/123"}]}
            ],"token":{"id":"abc123"}}}"#,
        );

        let mut session = Session::new();
        apply(access, &mut session);

        // catalog order decides: cloudFiles came last, so it wins
        assert_eq!(
            session.cdn_url(),
            Some("https://storage.clouddrive.com/v1/123")
        );
    }

    #[test]
    fn test_entry_without_endpoints_is_skipped() {
        let access = parse(
            r#"{"access":{"serviceCatalog":[
                {"name":"cloudFiles","endpoints":[]},
                {"name":"cloudServersOpenStack"}
            ],"token":{"id":"abc123"}}}"#,
        );

        let mut session = Session::new();
        apply(access, &mut session);

        assert_eq!(session.token(), Some("abc123"));
        assert_eq!(session.cdn_url(), None);
        assert_eq!(session.management_url(), None);
    }

    #[test]
    fn test_rules_table_targets() {
        assert_eq!(CATALOG_RULES.len(), 3);
        assert_eq!(CATALOG_RULES[0], ("cloudServersOpenStack", EndpointKind::Management));
        assert_eq!(CATALOG_RULES[1], ("cloudFilesCDN", EndpointKind::Cdn));
        assert_eq!(CATALOG_RULES[2], ("cloudFiles", EndpointKind::Cdn));
    }
}
