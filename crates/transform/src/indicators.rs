use anyhow::Result;
use graph::IdTranslationTable;
use objects::xml::{empty, end, leaf, start};
use objects::Observable;
use payload::IndicatorInput;
use quick_xml::Writer;
use std::io::Write;

/// Assembled indicator with idref-only pointers at the observables it
/// references. Pointers are references, never inline copies, so the same
/// observable may legitimately be referenced by several indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub id: String,
    pub title: String,
    pub description: String,
    pub confidence: String,
    pub indicator_type: String,
    pub observable_refs: Vec<String>,
}

/// Match each authored indicator to the reconciled observables it references.
/// Indicators reference *input* ids, so a reconciled observable matches on
/// its comparison id: the original id its synthetic id translates back to,
/// or its own id when it was never expanded. Output order follows authoring
/// input order.
pub fn assemble_indicators(
    inputs: &[IndicatorInput],
    observables: &[Observable],
    translations: &IdTranslationTable,
) -> Vec<Indicator> {
    inputs
        .iter()
        .map(|input| {
            let observable_refs = observables
                .iter()
                .filter(|observable| {
                    let comparison_id = translations.resolve(&observable.id);
                    input
                        .related_observables
                        .iter()
                        .any(|related| related == comparison_id)
                })
                .map(|observable| observable.id.clone())
                .collect();

            Indicator {
                id: input.indicator_id.clone(),
                title: input.indicator_title.clone(),
                description: input.indicator_description.clone(),
                confidence: input.indicator_confidence.clone(),
                indicator_type: input.object_type.clone(),
                observable_refs,
            }
        })
        .collect()
}

impl Indicator {
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(
            writer,
            "stix:Indicator",
            &[("id", self.id.as_str()), ("xsi:type", "indicator:IndicatorType")],
        )?;
        leaf(writer, "indicator:Title", &[], &self.title)?;
        if !self.indicator_type.is_empty() {
            leaf(writer, "indicator:Type", &[], &self.indicator_type)?;
        }
        if !self.description.is_empty() {
            leaf(writer, "indicator:Description", &[], &self.description)?;
        }
        for idref in &self.observable_refs {
            empty(writer, "indicator:Observable", &[("idref", idref.as_str())])?;
        }
        if !self.confidence.is_empty() {
            start(writer, "indicator:Confidence", &[])?;
            leaf(writer, "stixCommon:Value", &[], &self.confidence)?;
            end(writer, "indicator:Confidence")?;
        }
        end(writer, "stix:Indicator")
    }
}
