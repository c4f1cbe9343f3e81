use crate::campaign::{assemble_campaign, Campaign, ThreatActor};
use crate::config::TransformConfig;
use crate::indicators::{assemble_indicators, Indicator};
use crate::reconcile::{reconcile, Skipped};
use anyhow::{bail, Result};
use chrono::Utc;
use objects::xml::{empty, end, leaf, start};
use objects::{Observable, TransformerRegistry};
use payload::Bundle;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use tracing::{error, info};

/// What one run hands back: the serialized document plus the ids that were
/// dropped along the way. The caller never sees per-observable errors as
/// exceptions; it sees a document or an aborted run.
#[derive(Debug)]
pub struct TransformOutput {
    pub xml: String,
    pub skipped: Vec<Skipped>,
}

/// Entry point of the pipeline. Owns the registry and the run configuration;
/// holds no per-run state, so one instance can serve many runs and separate
/// instances can run in parallel.
pub struct Transformer {
    registry: TransformerRegistry,
    config: TransformConfig,
}

impl Transformer {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            registry: TransformerRegistry::with_builtins(),
            config,
        }
    }

    /// A transformer with extra (or replacement) object transformers.
    pub fn with_registry(config: TransformConfig, registry: TransformerRegistry) -> Self {
        Self { registry, config }
    }

    /// Run the whole pipeline on one authored bundle.
    ///
    /// Fatal only when a required top-level section is missing; everything
    /// per-observable degrades into the skip report. An empty-but-present
    /// observables list is a valid run producing a document with no
    /// observables; only the absent key aborts.
    pub fn transform(&self, bundle: &Bundle) -> Result<TransformOutput> {
        let Some(header) = bundle.stix_header.as_ref() else {
            error!("No stix_header section in bundle, aborting run");
            bail!("bundle has no stix_header section");
        };
        let Some(observable_inputs) = bundle.observables.as_ref() else {
            error!("No observables section in bundle, aborting run");
            bail!("bundle has no observables section");
        };

        let reconciled = reconcile(observable_inputs, &self.registry, &self.config);
        let indicators = assemble_indicators(
            &bundle.indicators,
            &reconciled.observables,
            &reconciled.translations,
        );
        let campaign = assemble_campaign(bundle.campaign.as_ref());

        let xml = self.write_package(
            header,
            &indicators,
            &reconciled.observables,
            campaign.as_ref(),
        )?;

        info!(
            observables = reconciled.observables.len(),
            indicators = indicators.len(),
            skipped = reconciled.skipped.len(),
            campaign = campaign.is_some(),
            "Transformation run complete"
        );

        Ok(TransformOutput {
            xml,
            skipped: reconciled.skipped,
        })
    }

    fn write_package(
        &self,
        header: &payload::HeaderInput,
        indicators: &[Indicator],
        observables: &[Observable],
        campaign: Option<&(Campaign, ThreatActor)>,
    ) -> Result<String> {
        let package_id = self.config.mint_id("Package");
        let namespace_uri = self.config.namespace_uri();
        let namespace_attr = format!("xmlns:{}", self.config.namespace_prefix);

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        start(
            &mut writer,
            "stix:STIX_Package",
            &[
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
                ("xmlns:stix", "http://stix.mitre.org/stix-1"),
                ("xmlns:stixCommon", "http://stix.mitre.org/common-1"),
                ("xmlns:indicator", "http://stix.mitre.org/Indicator-2"),
                ("xmlns:campaign", "http://stix.mitre.org/Campaign-1"),
                ("xmlns:ta", "http://stix.mitre.org/ThreatActor-1"),
                ("xmlns:marking", "http://data-marking.mitre.org/Marking-1"),
                (
                    "xmlns:tlpMarking",
                    "http://data-marking.mitre.org/extensions/MarkingStructure#TLP-1",
                ),
                ("xmlns:cybox", "http://cybox.mitre.org/cybox-2"),
                ("xmlns:cyboxCommon", "http://cybox.mitre.org/common-2"),
                (namespace_attr.as_str(), namespace_uri.as_str()),
                ("id", package_id.as_str()),
                ("version", "1.1.1"),
            ],
        )?;

        // Header with handling marking and tool provenance.
        start(&mut writer, "stix:STIX_Header", &[])?;
        leaf(&mut writer, "stix:Title", &[], &header.stix_header_title)?;
        if !header.stix_header_description.is_empty() {
            leaf(
                &mut writer,
                "stix:Description",
                &[],
                &header.stix_header_description,
            )?;
        }
        start(&mut writer, "stix:Handling", &[])?;
        start(
            &mut writer,
            "marking:Marking",
            &[("idref", package_id.as_str())],
        )?;
        leaf(&mut writer, "marking:Controlled_Structure", &[], "//node()")?;
        empty(
            &mut writer,
            "marking:Marking_Structure",
            &[
                ("xsi:type", "tlpMarking:TLPMarkingStructureType"),
                ("color", header.stix_header_tlp.as_str()),
            ],
        )?;
        end(&mut writer, "marking:Marking")?;
        end(&mut writer, "stix:Handling")?;
        start(&mut writer, "stix:Information_Source", &[])?;
        start(&mut writer, "stixCommon:Tools", &[])?;
        start(&mut writer, "cyboxCommon:Tool", &[])?;
        leaf(&mut writer, "cyboxCommon:Name", &[], &self.config.tool_name)?;
        leaf(
            &mut writer,
            "cyboxCommon:Vendor",
            &[],
            &self.config.tool_vendor,
        )?;
        end(&mut writer, "cyboxCommon:Tool")?;
        end(&mut writer, "stixCommon:Tools")?;
        start(&mut writer, "stixCommon:Time", &[])?;
        leaf(
            &mut writer,
            "cyboxCommon:Produced_Time",
            &[],
            &Utc::now().to_rfc3339(),
        )?;
        end(&mut writer, "stixCommon:Time")?;
        end(&mut writer, "stix:Information_Source")?;
        end(&mut writer, "stix:STIX_Header")?;

        if !indicators.is_empty() {
            start(&mut writer, "stix:Indicators", &[])?;
            for indicator in indicators {
                indicator.write_xml(&mut writer)?;
            }
            end(&mut writer, "stix:Indicators")?;
        }

        start(
            &mut writer,
            "stix:Observables",
            &[("cybox_major_version", "2"), ("cybox_minor_version", "1")],
        )?;
        for observable in observables {
            observable.write_xml(&mut writer)?;
        }
        end(&mut writer, "stix:Observables")?;

        if let Some((campaign, actor)) = campaign {
            start(&mut writer, "stix:Campaigns", &[])?;
            campaign.write_xml(&mut writer)?;
            end(&mut writer, "stix:Campaigns")?;
            start(&mut writer, "stix:Threat_Actors", &[])?;
            actor.write_xml(&mut writer)?;
            end(&mut writer, "stix:Threat_Actors")?;
        }

        end(&mut writer, "stix:STIX_Package")?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload::parse_bundle;

    fn transformer() -> Transformer {
        Transformer::new(TransformConfig::default())
    }

    #[test]
    fn test_missing_observables_section_is_fatal() {
        let bundle = parse_bundle(
            r#"{"indicators": [], "stix_header": {"stix_header_title": "t",
                "stix_header_description": "", "stix_header_tlp": "GREEN"}}"#,
        )
        .unwrap();

        let err = transformer().transform(&bundle).unwrap_err();
        assert!(err.to_string().contains("observables"));
    }

    #[test]
    fn test_missing_header_section_is_fatal() {
        let bundle = parse_bundle(r#"{"observables": [], "indicators": []}"#).unwrap();
        let err = transformer().transform(&bundle).unwrap_err();
        assert!(err.to_string().contains("stix_header"));
    }

    #[test]
    fn test_empty_observables_list_still_produces_a_document() {
        let bundle = parse_bundle(
            r#"{"observables": [], "indicators": [], "stix_header": {
                "stix_header_title": "Empty run",
                "stix_header_description": "",
                "stix_header_tlp": "WHITE"}}"#,
        )
        .unwrap();

        let out = transformer().transform(&bundle).unwrap();
        assert!(out.xml.contains("<stix:Title>Empty run</stix:Title>"));
        assert!(out.xml.contains(r#"color="WHITE""#));
        assert!(out.skipped.is_empty());
    }
}
