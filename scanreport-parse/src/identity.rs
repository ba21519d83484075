use crate::xml::XmlElement;

/// Join key for a port's `<service>` element.
///
/// `product` and `version` when a product is known, otherwise the bare service
/// name, followed by every CPE in parentheses. Each part is followed by a single
/// space, so `nginx 1.18` with no CPE yields `"nginx 1.18 "`.
pub fn service_identity(service: Option<&XmlElement>) -> String {
    let Some(service) = service else {
        return String::new();
    };

    let mut key = String::new();
    if let Some(product) = service.attr("product") {
        key.push_str(product);
        key.push(' ');
        if let Some(version) = service.attr("version") {
            key.push_str(version);
            key.push(' ');
        }
    } else if let Some(name) = service.attr("name") {
        key.push_str(name);
        key.push(' ');
    }

    for cpe in service.children("cpe") {
        key.push('(');
        key.push_str(&cpe.text);
        key.push_str(") ");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn identity_of(xml: &str) -> String {
        let service = parse_document(xml).unwrap();
        service_identity(Some(&service))
    }

    #[test]
    fn product_and_version() {
        assert_eq!(
            identity_of(r#"<service name="http" product="nginx" version="1.18"/>"#),
            "nginx 1.18 "
        );
    }

    #[test]
    fn product_without_version() {
        assert_eq!(identity_of(r#"<service name="ssh" product="OpenSSH"/>"#), "OpenSSH ");
    }

    #[test]
    fn falls_back_to_name() {
        assert_eq!(identity_of(r#"<service name="domain" version="9.1"/>"#), "domain ");
    }

    #[test]
    fn appends_every_cpe() {
        let xml = r#"<service name="ssh" product="OpenSSH" version="8.9p1">
            <cpe>cpe:/a:openbsd:openssh:8.9p1</cpe>
            <cpe>cpe:/o:linux:linux_kernel</cpe>
        </service>"#;
        assert_eq!(
            identity_of(xml),
            "OpenSSH 8.9p1 (cpe:/a:openbsd:openssh:8.9p1) (cpe:/o:linux:linux_kernel) "
        );
    }

    #[test]
    fn missing_service_is_empty() {
        assert_eq!(service_identity(None), "");
        assert_eq!(identity_of("<service/>"), "");
    }
}
