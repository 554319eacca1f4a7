use coco_analysis::completion::CompletionCandidate;
use coco_analysis::{GrammarSnapshot, LegalConstructSet};
use coco_parser::coco::parsing::ParseDiagnostic;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CandidateReport<'a> {
    pub label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<&'a str>,
}

/// Output of `coco complete`
#[derive(Debug, Serialize)]
pub struct CompletionReport<'a> {
    pub legal_constructs: LegalConstructSet,
    pub candidates: Vec<CandidateReport<'a>>,
    pub diagnostics: &'a [ParseDiagnostic],
}

pub fn completion<'a>(
    snapshot: &'a GrammarSnapshot,
    candidates: &'a [CompletionCandidate],
) -> CompletionReport<'a> {
    CompletionReport {
        legal_constructs: snapshot.legal_constructs,
        candidates: candidates
            .iter()
            .map(|candidate| CandidateReport {
                label: &candidate.label,
                detail: candidate.detail.as_deref(),
                insert_text: candidate.insert_text.as_deref(),
            })
            .collect(),
        diagnostics: &snapshot.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coco_analysis::completion::completion_items;
    use coco_analysis::LegalConstruct;
    use coco_config::CompletionConfig;

    #[test]
    fn report_shape() {
        let snapshot = GrammarSnapshot {
            legal_constructs: [LegalConstruct::Period].into(),
            ..GrammarSnapshot::default()
        };
        let config = CompletionConfig {
            include_keywords: true,
            include_descriptions: false,
            suggest_undeclared_productions: true,
        };
        let candidates = completion_items(&snapshot, &config);
        let json = serde_json::to_value(completion(&snapshot, &candidates)).unwrap();
        assert_eq!(json["legal_constructs"], serde_json::json!(["Period"]));
        assert_eq!(json["candidates"][0]["label"], ".");
        assert_eq!(json["candidates"][0]["insert_text"], ".");
        assert!(json["candidates"][0].get("detail").is_none());
        assert_eq!(json["diagnostics"], serde_json::json!([]));
    }
}
