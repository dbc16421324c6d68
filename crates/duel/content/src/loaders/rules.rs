//! Rule program loader.
//!
//! Rule files use plain string tags, so a program authored against a newer
//! rule vocabulary still loads: unknown conditions become
//! [`Condition::Unknown`] (never matches) and rules with unknown actions are
//! skipped with a warning.

use std::path::Path;
use std::str::FromStr;

use duel_core::{Action, Condition, Rule, RuleProgram};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One rule as written in a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub priority: i32,
    pub condition: String,
    #[serde(default, alias = "conditionValue", alias = "condition_value")]
    pub value: Option<f64>,
    pub action: String,
}

impl RuleSpec {
    /// Converts to a typed rule; `None` when the action tag is unknown.
    pub fn to_rule(&self) -> Option<Rule> {
        let action = Action::from_str(&self.action).ok()?;
        Some(Rule {
            priority: self.priority,
            condition: Condition::parse(&self.condition),
            value: self.value,
            action,
        })
    }
}

/// Rule program file structure.
///
/// ```ron
/// (
///     name: "brawler",
///     rules: [
///         (priority: 10, condition: "MY_SUPER_AVAILABLE", action: "USE_SUPER_ATTACK_1"),
///         (priority: 5, condition: "MY_HP_BELOW", value: Some(30.0), action: "HEALING_ROUTINE"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub name: Option<String>,
    pub rules: Vec<RuleSpec>,
}

/// JSON programs are accepted either wrapped like [`RuleFile`] or as a bare
/// array of rules.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRules {
    File(RuleFile),
    Bare(Vec<RuleSpec>),
}

/// Compiles string-tagged rules into a sorted program.
pub fn compile_rules(specs: &[RuleSpec]) -> RuleProgram {
    specs
        .iter()
        .filter_map(|spec| {
            let rule = spec.to_rule();
            if rule.is_none() {
                tracing::warn!(
                    action = %spec.action,
                    priority = spec.priority,
                    "skipping rule with unknown action"
                );
            } else if Condition::parse(&spec.condition) == Condition::Unknown {
                tracing::warn!(
                    condition = %spec.condition,
                    priority = spec.priority,
                    "rule has unknown condition and will never match"
                );
            }
            rule
        })
        .collect()
}

/// Loader for rule programs from RON or JSON files.
pub struct RuleLoader;

impl RuleLoader {
    /// Load a rule program, picking the format from the file extension
    /// (`.json` is JSON, anything else RON).
    pub fn load(path: &Path) -> LoadResult<RuleProgram> {
        let content = read_file(path)?;
        let file = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_ron(&content),
        }
        .map_err(|e| anyhow::anyhow!("Invalid rule program {}: {}", path.display(), e))?;

        let program = compile_rules(&file.rules);
        tracing::debug!(
            path = %path.display(),
            rules = program.len(),
            skipped = file.rules.len() - program.len(),
            "loaded rule program"
        );
        Ok(program)
    }

    pub fn parse_ron(content: &str) -> LoadResult<RuleFile> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse rules RON: {}", e))
    }

    pub fn parse_json(content: &str) -> LoadResult<RuleFile> {
        let rules: JsonRules = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules JSON: {}", e))?;
        Ok(match rules {
            JsonRules::File(file) => file,
            JsonRules::Bare(rules) => RuleFile { name: None, rules },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_degrade() {
        let file = RuleLoader::parse_ron(
            r#"(
                rules: [
                    (priority: 1, condition: "MY_HP_BELOW", value: Some(40.0), action: "HEALING_ROUTINE"),
                    (priority: 9, condition: "ENEMY_IS_SLEEPY", action: "USE_HEAVY_ATTACK"),
                    (priority: 5, condition: "MY_HP_ABOVE", action: "DANCE"),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(file.name, None);

        let program = compile_rules(&file.rules);
        assert_eq!(program.len(), 2);
        assert_eq!(program.rules()[0].condition, Condition::Unknown);
        assert_eq!(program.rules()[0].priority, 9);
        assert_eq!(program.rules()[1].action, Action::HealingRoutine);
        assert_eq!(program.rules()[1].value, Some(40.0));
    }

    #[test]
    fn json_accepts_bare_array_with_camel_case_value() {
        let file = RuleLoader::parse_json(
            r#"[
                {"priority": 3, "condition": "ENEMY_HP_BELOW", "conditionValue": 25, "action": "USE_SUPER_ATTACK_2"},
                {"priority": 1, "condition": "I_AM_STUNNED", "action": "FULL_DEFENSE"}
            ]"#,
        )
        .unwrap();
        let program = compile_rules(&file.rules);
        assert_eq!(program.rules()[0].value, Some(25.0));
        assert_eq!(program.rules()[0].action, Action::UseSuperAttack2);
        assert_eq!(program.rules()[1].condition, Condition::IAmStunned);
    }

    #[test]
    fn json_accepts_wrapped_file() {
        let file = RuleLoader::parse_json(
            r#"{"name": "turtle", "rules": [{"priority": 1, "condition": "ROUND_NUMBER_ABOVE", "value": 10, "action": "COUNTER_STANCE"}]}"#,
        )
        .unwrap();
        assert_eq!(file.name.as_deref(), Some("turtle"));
        assert_eq!(file.rules.len(), 1);
    }
}
