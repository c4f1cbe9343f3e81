use anyhow::Result;
use objects::xml::{empty, end, leaf, start};
use payload::CampaignInput;
use quick_xml::Writer;
use std::io::Write;
use tracing::debug;

/// One campaign activity window: a timestamp with a label saying which end
/// of the window it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub date_time: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub name: String,
    pub title: String,
    pub description: String,
    pub confidence: String,
    pub handling_color: String,
    pub information_source: String,
    pub status: String,
    pub activity: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatActor {
    pub identity_name: String,
    pub identity_aliases: Vec<String>,
    pub title: String,
    pub description: String,
    pub information_source: String,
    pub confidence: String,
    pub associated_campaign: String,
}

/// Build the campaign and its threat actor from the authored block.
/// Campaign and actor are optional: missing block, missing actor or empty
/// name fields mean the section is silently omitted from the document.
pub fn assemble_campaign(input: Option<&CampaignInput>) -> Option<(Campaign, ThreatActor)> {
    let campaign_input = input?;
    let actor_input = campaign_input.threatactor.as_ref()?;

    if campaign_input.name.trim().is_empty() || actor_input.identity_name.trim().is_empty() {
        debug!("Campaign or threat actor name empty, omitting campaign section");
        return None;
    }

    let campaign = Campaign {
        name: campaign_input.name.clone(),
        title: campaign_input.title.clone(),
        description: campaign_input.description.clone(),
        confidence: campaign_input.confidence.clone(),
        handling_color: campaign_input.handling.clone(),
        information_source: campaign_input.information_source.clone(),
        status: campaign_input.status.clone(),
        activity: vec![
            Activity {
                date_time: campaign_input.activity_timestamp_from.clone(),
                description: "from timestamp".to_string(),
            },
            Activity {
                date_time: campaign_input.activity_timestamp_to.clone(),
                description: "to timestamp".to_string(),
            },
        ],
    };

    let actor = ThreatActor {
        identity_name: actor_input.identity_name.clone(),
        identity_aliases: actor_input
            .identity_aliases
            .split('\n')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(str::to_string)
            .collect(),
        title: actor_input.title.clone(),
        description: actor_input.description.clone(),
        information_source: actor_input.information_source.clone(),
        confidence: actor_input.confidence.clone(),
        associated_campaign: campaign.name.clone(),
    };

    Some((campaign, actor))
}

impl Campaign {
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "stix:Campaign", &[("xsi:type", "campaign:CampaignType")])?;
        if !self.title.is_empty() {
            leaf(writer, "campaign:Title", &[], &self.title)?;
        }
        if !self.description.is_empty() {
            leaf(writer, "campaign:Description", &[], &self.description)?;
        }
        start(writer, "campaign:Names", &[])?;
        leaf(writer, "campaign:Name", &[], &self.name)?;
        end(writer, "campaign:Names")?;
        if !self.status.is_empty() {
            leaf(writer, "campaign:Status", &[], &self.status)?;
        }
        for activity in &self.activity {
            start(writer, "campaign:Activity", &[])?;
            leaf(
                writer,
                "stixCommon:Date_Time",
                &[("precision", "minute")],
                &activity.date_time,
            )?;
            leaf(writer, "stixCommon:Description", &[], &activity.description)?;
            end(writer, "campaign:Activity")?;
        }
        if !self.confidence.is_empty() {
            start(writer, "campaign:Confidence", &[])?;
            leaf(writer, "stixCommon:Value", &[], &self.confidence)?;
            end(writer, "campaign:Confidence")?;
        }
        if !self.information_source.is_empty() {
            start(writer, "campaign:Information_Source", &[])?;
            leaf(writer, "stixCommon:Description", &[], &self.information_source)?;
            end(writer, "campaign:Information_Source")?;
        }
        if !self.handling_color.is_empty() {
            start(writer, "campaign:Handling", &[])?;
            start(writer, "marking:Marking", &[])?;
            empty(
                writer,
                "marking:Marking_Structure",
                &[
                    ("xsi:type", "tlpMarking:TLPMarkingStructureType"),
                    ("color", self.handling_color.as_str()),
                ],
            )?;
            end(writer, "marking:Marking")?;
            end(writer, "campaign:Handling")?;
        }
        end(writer, "stix:Campaign")
    }
}

impl ThreatActor {
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(
            writer,
            "stix:Threat_Actor",
            &[("xsi:type", "ta:ThreatActorType")],
        )?;
        if !self.title.is_empty() {
            leaf(writer, "ta:Title", &[], &self.title)?;
        }
        if !self.description.is_empty() {
            leaf(writer, "ta:Description", &[], &self.description)?;
        }
        start(writer, "ta:Identity", &[])?;
        leaf(writer, "stixCommon:Name", &[], &self.identity_name)?;
        if !self.identity_aliases.is_empty() {
            start(writer, "stixCommon:Related_Identities", &[])?;
            for alias in &self.identity_aliases {
                start(writer, "stixCommon:Related_Identity", &[])?;
                start(writer, "stixCommon:Identity", &[])?;
                leaf(writer, "stixCommon:Name", &[], alias)?;
                end(writer, "stixCommon:Identity")?;
                end(writer, "stixCommon:Related_Identity")?;
            }
            end(writer, "stixCommon:Related_Identities")?;
        }
        end(writer, "ta:Identity")?;
        if !self.confidence.is_empty() {
            start(writer, "ta:Confidence", &[])?;
            leaf(writer, "stixCommon:Value", &[], &self.confidence)?;
            end(writer, "ta:Confidence")?;
        }
        if !self.information_source.is_empty() {
            start(writer, "ta:Information_Source", &[])?;
            leaf(writer, "stixCommon:Description", &[], &self.information_source)?;
            end(writer, "ta:Information_Source")?;
        }
        start(writer, "ta:Associated_Campaigns", &[])?;
        start(writer, "ta:Associated_Campaign", &[])?;
        start(writer, "stixCommon:Names", &[])?;
        leaf(writer, "stixCommon:Name", &[], &self.associated_campaign)?;
        end(writer, "stixCommon:Names")?;
        end(writer, "ta:Associated_Campaign")?;
        end(writer, "ta:Associated_Campaigns")?;
        end(writer, "stix:Threat_Actor")
    }
}
