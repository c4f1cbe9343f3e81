use crate::config::TransformConfig;
use graph::{IdTranslationTable, RelationGraph};
use objects::{Observable, RelatedObject, Transformed, TransformerRegistry};
use payload::ObservableInput;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// One observable that could not be transformed. Non-fatal: the run keeps
/// going without it and the assembler reports the skip alongside the result.
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub observable_id: String,
    pub reason: String,
}

/// Result of reconciliation: the native observables (input order, expansion
/// products in place), the rewritten relation graph, the synthetic-id
/// translation table and the skip report.
#[derive(Debug)]
pub struct Reconciled {
    pub observables: Vec<Observable>,
    pub graph: RelationGraph,
    pub translations: IdTranslationTable,
    pub skipped: Vec<Skipped>,
}

/// Turn authored observables into a consistent set of native objects with a
/// relation graph whose attached edges all resolve.
///
/// Each input is dispatched through the registry. A 1:1 result keeps the
/// input id as its effective id. A 1:N result gets a fresh synthetic id per
/// object and the graph is rewritten so every edge that touched the input id
/// now touches every synthetic id. Failed inputs are dropped; edges pointing
/// at them stay in the graph but are skipped at attachment time.
pub fn reconcile(
    inputs: &[ObservableInput],
    registry: &TransformerRegistry,
    config: &TransformConfig,
) -> Reconciled {
    // Collect the authored relations before touching any ids.
    let mut relation_graph = RelationGraph::new();
    for input in inputs {
        for (related_id, label) in &input.related_observables {
            relation_graph.relate(&input.observable_id, related_id, label);
        }
    }

    let mut translations = IdTranslationTable::new();
    let mut skipped = Vec::new();
    // (effective id, native object), input order preserved.
    let mut produced: Vec<Observable> = Vec::new();

    for input in inputs {
        let Some(type_tag) = input.object_type() else {
            warn!(observable_id = %input.observable_id, "Observable has no object_type");
            skipped.push(Skipped {
                observable_id: input.observable_id.clone(),
                reason: "missing object_type property".to_string(),
            });
            continue;
        };

        let Some(transformer) = registry.get(&type_tag) else {
            warn!(
                observable_id = %input.observable_id,
                object_type = %type_tag,
                "No transformer registered for object type"
            );
            skipped.push(Skipped {
                observable_id: input.observable_id.clone(),
                reason: format!("unknown object type '{}'", type_tag),
            });
            continue;
        };

        match transformer.process(&input.observable_properties) {
            Ok(Transformed::Single(object)) => {
                produced.push(Observable::new(input.observable_id.clone(), object));
            }
            Ok(Transformed::Multiple(cybox_objects)) => {
                let mut new_ids = Vec::with_capacity(cybox_objects.len());
                for object in cybox_objects {
                    let synthetic_id = config.mint_id("Observable");
                    translations.record(&synthetic_id, &input.observable_id);
                    new_ids.push(synthetic_id.clone());
                    produced.push(Observable::new(synthetic_id, object));
                }
                relation_graph = relation_graph.expand(&input.observable_id, &new_ids);
                info!(
                    observable_id = %input.observable_id,
                    expanded_into = new_ids.len(),
                    "Observable expanded into multiple objects"
                );
            }
            Err(e) => {
                warn!(
                    observable_id = %input.observable_id,
                    object_type = %type_tag,
                    error = %e,
                    "Object transformer failed, skipping observable"
                );
                skipped.push(Skipped {
                    observable_id: input.observable_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    // Attach relations onto the produced objects. An edge whose source or
    // target was never produced is dangling and silently skipped.
    let index: HashMap<&str, usize> = produced
        .iter()
        .enumerate()
        .map(|(i, o)| (o.id.as_str(), i))
        .collect();

    let mut attachments: Vec<(usize, RelatedObject)> = Vec::new();
    for (source, target, label) in relation_graph.edges() {
        let Some(&source_idx) = index.get(source) else {
            continue;
        };
        if !index.contains_key(target) {
            continue;
        }
        attachments.push((
            source_idx,
            RelatedObject {
                idref: target.to_string(),
                relationship: label.to_string(),
            },
        ));
    }
    for (source_idx, related) in attachments {
        produced[source_idx].related.push(related);
    }
    // Stable output regardless of hash iteration order.
    for observable in &mut produced {
        observable.related.sort_by(|a, b| a.idref.cmp(&b.idref));
    }

    Reconciled {
        observables: produced,
        graph: relation_graph,
        translations,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observable(id: &str, properties: serde_json::Value, relations: &[(&str, &str)]) -> ObservableInput {
        ObservableInput {
            observable_id: id.to_string(),
            observable_properties: properties.as_object().unwrap().clone(),
            related_observables: relations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn address(id: &str, ip: &str, relations: &[(&str, &str)]) -> ObservableInput {
        observable(
            id,
            json!({"object_type": "address", "ip_addr": ip}),
            relations,
        )
    }

    #[test]
    fn test_one_to_one_keeps_input_id() {
        let inputs = vec![address("obs-1", "10.0.0.1", &[])];
        let reconciled = reconcile(
            &inputs,
            &TransformerRegistry::with_builtins(),
            &TransformConfig::default(),
        );

        assert_eq!(reconciled.observables.len(), 1);
        assert_eq!(reconciled.observables[0].id, "obs-1");
        assert!(reconciled.translations.is_empty());
        assert!(reconciled.skipped.is_empty());
    }

    #[test]
    fn test_unknown_type_is_skipped_not_fatal() {
        let inputs = vec![
            observable("obs-1", json!({"object_type": "pigeon"}), &[]),
            address("obs-2", "10.0.0.2", &[("obs-1", "Related_To")]),
        ];
        let reconciled = reconcile(
            &inputs,
            &TransformerRegistry::with_builtins(),
            &TransformConfig::default(),
        );

        assert_eq!(reconciled.observables.len(), 1);
        assert_eq!(reconciled.skipped.len(), 1);
        assert_eq!(reconciled.skipped[0].observable_id, "obs-1");
        // The dangling edge obs-2 -> obs-1 must not have been attached.
        assert!(reconciled.observables[0].related.is_empty());
    }

    #[test]
    fn test_expansion_rewrites_relations_both_ways() {
        let inputs = vec![
            observable(
                "mail-1",
                json!({
                    "object_type": "email_message",
                    "subject": "Invoice",
                    "attachments": "a.exe\nb.exe"
                }),
                &[("ip-1", "Related_To")],
            ),
            address("ip-1", "10.0.0.3", &[("mail-1", "Received_From")]),
        ];
        let reconciled = reconcile(
            &inputs,
            &TransformerRegistry::with_builtins(),
            &TransformConfig::default(),
        );

        // message + two attachments + the address
        assert_eq!(reconciled.observables.len(), 4);
        assert_eq!(reconciled.translations.len(), 3);

        // Every expansion product points at ip-1.
        let expanded: Vec<&Observable> = reconciled
            .observables
            .iter()
            .filter(|o| reconciled.translations.is_synthetic(&o.id))
            .collect();
        assert_eq!(expanded.len(), 3);
        for observable in &expanded {
            assert_eq!(observable.related.len(), 1);
            assert_eq!(observable.related[0].idref, "ip-1");
            assert_eq!(observable.related[0].relationship, "Related_To");
        }

        // The address now points at all three synthetic ids, none at mail-1.
        let address_obs = reconciled
            .observables
            .iter()
            .find(|o| o.id == "ip-1")
            .unwrap();
        assert_eq!(address_obs.related.len(), 3);
        assert!(address_obs.related.iter().all(|r| r.idref != "mail-1"));
        assert!(address_obs
            .related
            .iter()
            .all(|r| r.relationship == "Received_From"));
    }

    #[test]
    fn test_self_relation_never_attached() {
        let inputs = vec![address("obs-1", "10.0.0.1", &[("obs-1", "Contains")])];
        let reconciled = reconcile(
            &inputs,
            &TransformerRegistry::with_builtins(),
            &TransformConfig::default(),
        );

        assert!(reconciled.observables[0].related.is_empty());
        assert_eq!(reconciled.graph.edge_count(), 0);
    }

    #[test]
    fn test_attached_edges_all_resolve() {
        let inputs = vec![
            address("a", "10.0.0.1", &[("b", "Connected_To"), ("missing", "Contains")]),
            address("b", "10.0.0.2", &[]),
        ];
        let reconciled = reconcile(
            &inputs,
            &TransformerRegistry::with_builtins(),
            &TransformConfig::default(),
        );

        let known: Vec<&str> = reconciled.observables.iter().map(|o| o.id.as_str()).collect();
        for observable in &reconciled.observables {
            for related in &observable.related {
                assert!(known.contains(&related.idref.as_str()));
            }
        }
        let a = reconciled.observables.iter().find(|o| o.id == "a").unwrap();
        assert_eq!(a.related.len(), 1);
    }
}
