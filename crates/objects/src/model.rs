use crate::xml::{end, leaf, start};
use anyhow::Result;
use quick_xml::Writer;
use std::io::Write;

/// Native CybOX-style object produced by a transformer. One authored
/// observable maps to one of these in the 1:1 case, or several in the 1:N
/// case (composite artifacts decomposing into typed sub-objects).
#[derive(Debug, Clone, PartialEq)]
pub enum CyboxObject {
    HttpSession(HttpSession),
    File(FileObject),
    Address(Address),
    DomainName(DomainName),
    NetworkConnection(NetworkConnection),
    EmailMessage(EmailMessage),
}

impl CyboxObject {
    pub fn xsi_type(&self) -> &'static str {
        match self {
            CyboxObject::HttpSession(_) => "HTTPSessionObj:HTTPSessionObjectType",
            CyboxObject::File(_) => "FileObj:FileObjectType",
            CyboxObject::Address(_) => "AddressObj:AddressObjectType",
            CyboxObject::DomainName(_) => "DomainNameObj:DomainNameObjectType",
            CyboxObject::NetworkConnection(_) => "NetworkConnectionObj:NetworkConnectionObjectType",
            CyboxObject::EmailMessage(_) => "EmailMessageObj:EmailMessageObjectType",
        }
    }

    /// Emit the `<cybox:Properties>` block for this object.
    pub fn write_properties<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "cybox:Properties", &[("xsi:type", self.xsi_type())])?;
        match self {
            CyboxObject::HttpSession(o) => o.write_body(writer)?,
            CyboxObject::File(o) => o.write_body(writer)?,
            CyboxObject::Address(o) => o.write_body(writer)?,
            CyboxObject::DomainName(o) => o.write_body(writer)?,
            CyboxObject::NetworkConnection(o) => o.write_body(writer)?,
            CyboxObject::EmailMessage(o) => o.write_body(writer)?,
        }
        end(writer, "cybox:Properties")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpSession {
    pub method: String,
    pub uri: String,
    pub host: String,
    pub port: u16,
    pub user_agent: Option<String>,
}

impl HttpSession {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "HTTPSessionObj:HTTP_Request_Response", &[])?;
        start(writer, "HTTPSessionObj:HTTP_Client_Request", &[])?;

        start(writer, "HTTPSessionObj:HTTP_Request_Line", &[])?;
        leaf(writer, "HTTPSessionObj:HTTP_Method", &[], &self.method)?;
        leaf(writer, "HTTPSessionObj:Value", &[], &self.uri)?;
        end(writer, "HTTPSessionObj:HTTP_Request_Line")?;

        start(writer, "HTTPSessionObj:HTTP_Request_Header", &[])?;
        start(writer, "HTTPSessionObj:Parsed_Header", &[])?;
        start(writer, "HTTPSessionObj:Host", &[])?;
        leaf(writer, "HTTPSessionObj:Domain_Name", &[], &self.host)?;
        leaf(
            writer,
            "HTTPSessionObj:Port",
            &[],
            &self.port.to_string(),
        )?;
        end(writer, "HTTPSessionObj:Host")?;
        if let Some(agent) = &self.user_agent {
            leaf(writer, "HTTPSessionObj:User_Agent", &[], agent)?;
        }
        end(writer, "HTTPSessionObj:Parsed_Header")?;
        end(writer, "HTTPSessionObj:HTTP_Request_Header")?;

        end(writer, "HTTPSessionObj:HTTP_Client_Request")?;
        end(writer, "HTTPSessionObj:HTTP_Request_Response")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    /// "MD5", "SHA1" or "SHA256"
    pub hash_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileObject {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub size_in_bytes: Option<u64>,
    pub hashes: Vec<FileHash>,
}

impl FileObject {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if let Some(name) = &self.file_name {
            leaf(writer, "FileObj:File_Name", &[], name)?;
        }
        if let Some(path) = &self.file_path {
            leaf(writer, "FileObj:File_Path", &[], path)?;
        }
        if let Some(size) = self.size_in_bytes {
            leaf(writer, "FileObj:Size_In_Bytes", &[], &size.to_string())?;
        }
        if !self.hashes.is_empty() {
            start(writer, "FileObj:Hashes", &[])?;
            for hash in &self.hashes {
                start(writer, "cyboxCommon:Hash", &[])?;
                leaf(writer, "cyboxCommon:Type", &[], &hash.hash_type)?;
                leaf(writer, "cyboxCommon:Simple_Hash_Value", &[], &hash.value)?;
                end(writer, "cyboxCommon:Hash")?;
            }
            end(writer, "FileObj:Hashes")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub address_value: String,
    pub category: String,
}

impl Address {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        leaf(
            writer,
            "AddressObj:Address_Value",
            &[("category", self.category.as_str())],
            &self.address_value,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName {
    pub value: String,
    pub domain_type: String,
}

impl DomainName {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        leaf(
            writer,
            "DomainNameObj:Value",
            &[("type", self.domain_type.as_str())],
            &self.value,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConnection {
    pub layer4_protocol: String,
    pub source_ip: String,
    pub source_port: u16,
    pub destination_ip: String,
    pub destination_port: u16,
}

impl NetworkConnection {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        leaf(
            writer,
            "NetworkConnectionObj:Layer4_Protocol",
            &[],
            &self.layer4_protocol,
        )?;
        Self::write_socket_address(
            writer,
            "NetworkConnectionObj:Source_Socket_Address",
            &self.source_ip,
            self.source_port,
        )?;
        Self::write_socket_address(
            writer,
            "NetworkConnectionObj:Destination_Socket_Address",
            &self.destination_ip,
            self.destination_port,
        )
    }

    fn write_socket_address<W: Write>(
        writer: &mut Writer<W>,
        tag: &str,
        ip: &str,
        port: u16,
    ) -> Result<()> {
        start(writer, tag, &[])?;
        start(writer, "SocketAddressObj:IP_Address", &[])?;
        leaf(writer, "AddressObj:Address_Value", &[], ip)?;
        end(writer, "SocketAddressObj:IP_Address")?;
        start(writer, "SocketAddressObj:Port", &[])?;
        leaf(writer, "PortObj:Port_Value", &[], &port.to_string())?;
        end(writer, "SocketAddressObj:Port")?;
        end(writer, tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailMessage {
    pub subject: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
}

impl EmailMessage {
    fn write_body<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "EmailMessageObj:Header", &[])?;
        if !self.to.is_empty() {
            start(writer, "EmailMessageObj:To", &[])?;
            for recipient in &self.to {
                start(writer, "EmailMessageObj:Recipient", &[])?;
                leaf(writer, "AddressObj:Address_Value", &[], recipient)?;
                end(writer, "EmailMessageObj:Recipient")?;
            }
            end(writer, "EmailMessageObj:To")?;
        }
        if let Some(from) = &self.from {
            start(writer, "EmailMessageObj:From", &[])?;
            leaf(writer, "AddressObj:Address_Value", &[], from)?;
            end(writer, "EmailMessageObj:From")?;
        }
        if let Some(subject) = &self.subject {
            leaf(writer, "EmailMessageObj:Subject", &[], subject)?;
        }
        end(writer, "EmailMessageObj:Header")
    }
}

/// A reference-only pointer from one observable's object to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedObject {
    pub idref: String,
    pub relationship: String,
}

/// Document-level observable: the effective id plus the native object and
/// the relation entries attached during reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observable {
    pub id: String,
    pub object: CyboxObject,
    pub related: Vec<RelatedObject>,
}

impl Observable {
    pub fn new(id: String, object: CyboxObject) -> Self {
        Self {
            id,
            object,
            related: Vec::new(),
        }
    }

    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "cybox:Observable", &[("id", self.id.as_str())])?;
        start(writer, "cybox:Object", &[])?;
        self.object.write_properties(writer)?;
        if !self.related.is_empty() {
            start(writer, "cybox:Related_Objects", &[])?;
            for related in &self.related {
                start(
                    writer,
                    "cybox:Related_Object",
                    &[("idref", related.idref.as_str())],
                )?;
                leaf(writer, "cybox:Relationship", &[], &related.relationship)?;
                end(writer, "cybox:Related_Object")?;
            }
            end(writer, "cybox:Related_Objects")?;
        }
        end(writer, "cybox:Object")?;
        end(writer, "cybox:Observable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(observable: &Observable) -> String {
        let mut writer = Writer::new(Vec::new());
        observable.write_xml(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_observable_xml_carries_id_and_type() {
        let observable = Observable::new(
            "obs-1".to_string(),
            CyboxObject::Address(Address {
                address_value: "10.0.0.1".to_string(),
                category: "ipv4-addr".to_string(),
            }),
        );

        let xml = render(&observable);
        assert!(xml.contains(r#"<cybox:Observable id="obs-1">"#));
        assert!(xml.contains(r#"xsi:type="AddressObj:AddressObjectType""#));
        assert!(xml.contains(">10.0.0.1<"));
    }

    #[test]
    fn test_related_objects_are_idref_only() {
        let mut observable = Observable::new(
            "obs-1".to_string(),
            CyboxObject::DomainName(DomainName {
                value: "example.com".to_string(),
                domain_type: "FQDN".to_string(),
            }),
        );
        observable.related.push(RelatedObject {
            idref: "obs-2".to_string(),
            relationship: "Resolved_To".to_string(),
        });

        let xml = render(&observable);
        assert!(xml.contains(r#"<cybox:Related_Object idref="obs-2">"#));
        assert!(xml.contains("<cybox:Relationship>Resolved_To</cybox:Relationship>"));
    }
}
