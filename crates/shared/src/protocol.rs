use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Project;

pub const DEPLOY_API_VERSION: u8 = 2;
pub const NODE_BUILD_SOURCE: &str = "*.js";
pub const NODE_BUILDER: &str = "@now/node";
pub const STATIC_BUILDER: &str = "@now/static";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployFile {
    pub file: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(rename = "use")]
    pub builder: String,
}

/// Request body for the deployment service. Field order here is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub name: String,
    pub public: bool,
    pub version: u8,
    pub files: Vec<DeployFile>,
    pub builds: Vec<BuildStep>,
}

impl DeployRequest {
    pub fn from_project(project: &Project) -> Self {
        Self::from_parts(
            project.name(),
            project
                .files()
                .iter()
                .map(|file| (file.path.as_str(), file.content.as_str())),
        )
    }

    pub fn from_parts<'a>(name: &str, files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            name: name.to_string(),
            public: true,
            version: DEPLOY_API_VERSION,
            files: files
                .into_iter()
                .map(|(file, data)| DeployFile {
                    file: file.to_string(),
                    data: data.to_string(),
                })
                .collect(),
            builds: default_builds(),
        }
    }

    /// Renders the body sent over the wire: two-space indented JSON where each
    /// `files` and `builds` entry sits on its own line.
    pub fn to_body(&self) -> String {
        let mut lines = vec![
            "{".to_string(),
            format!("  \"name\": {},", json_string(&self.name)),
            format!("  \"public\": {},", self.public),
            format!("  \"version\": {},", self.version),
        ];

        lines.push("  \"files\": [".to_string());
        push_entries(
            &mut lines,
            self.files.iter().map(|entry| {
                format!(
                    "{{ \"file\": {}, \"data\": {} }}",
                    json_string(&entry.file),
                    json_string(&entry.data)
                )
            }),
        );
        lines.push("  ],".to_string());

        lines.push("  \"builds\": [".to_string());
        push_entries(&mut lines, self.builds.iter().map(render_build_step));
        lines.push("  ]".to_string());
        lines.push("}".to_string());

        lines.join("\n")
    }
}

pub fn default_builds() -> Vec<BuildStep> {
    vec![
        BuildStep {
            src: Some(NODE_BUILD_SOURCE.to_string()),
            builder: NODE_BUILDER.to_string(),
        },
        BuildStep {
            src: None,
            builder: STATIC_BUILDER.to_string(),
        },
    ]
}

fn render_build_step(step: &BuildStep) -> String {
    match &step.src {
        Some(src) => format!(
            "{{ \"src\": {}, \"use\": {} }}",
            json_string(src),
            json_string(&step.builder)
        ),
        None => format!("{{ \"use\": {} }}", json_string(&step.builder)),
    }
}

fn push_entries(lines: &mut Vec<String>, entries: impl ExactSizeIterator<Item = String>) {
    let last = entries.len().saturating_sub(1);
    for (i, entry) in entries.enumerate() {
        let separator = if i < last { "," } else { "" };
        lines.push(format!("    {entry}{separator}"));
    }
}

fn json_string(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

/// Success body of the deployment service. Only `url` is consumed; the rest is
/// kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponse {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "readyState", skip_serializing_if = "Option::is_none")]
    pub ready_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parsed_body(request: &DeployRequest) -> Value {
        serde_json::from_str(&request.to_body()).expect("body is valid json")
    }

    #[test]
    fn seed_scenario_serializes_files_in_insertion_order() {
        let project = Project::new(
            "simple-now-deployment",
            [
                ("pages/index.js", "A"),
                ("api/date.js", "B"),
                ("package.json", "C"),
            ],
        )
        .expect("project");

        let body = parsed_body(&DeployRequest::from_project(&project));
        assert_eq!(
            body,
            json!({
                "name": "simple-now-deployment",
                "public": true,
                "version": 2,
                "files": [
                    { "file": "pages/index.js", "data": "A" },
                    { "file": "api/date.js", "data": "B" },
                    { "file": "package.json", "data": "C" }
                ],
                "builds": [
                    { "src": "*.js", "use": "@now/node" },
                    { "use": "@now/static" }
                ]
            })
        );
    }

    #[test]
    fn body_keeps_envelope_field_order() {
        let body = DeployRequest::from_project(&Project::seed()).to_body();
        let positions: Vec<usize> = ["\"name\"", "\"public\"", "\"version\"", "\"files\"", "\"builds\""]
            .iter()
            .map(|key| body.find(key).expect("field present"))
            .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);

        let derived = serde_json::to_string(&DeployRequest::from_project(&Project::seed()))
            .expect("serialize");
        assert!(derived.starts_with("{\"name\":"));
        assert!(derived.find("\"files\"") < derived.find("\"builds\""));
    }

    #[test]
    fn decoding_files_reconstructs_the_project_mapping() {
        let project = Project::new(
            "escapes",
            [
                ("src/quote.js", "const s = \"hi\";\n\ttab\\slash"),
                ("unicode.txt", "héllo → wörld"),
                ("empty.txt", ""),
                ("z/last.js", "}\n"),
            ],
        )
        .expect("project");

        let decoded: DeployRequest =
            serde_json::from_str(&DeployRequest::from_project(&project).to_body()).expect("decode");

        let rebuilt: Vec<(String, String)> = decoded
            .files
            .into_iter()
            .map(|entry| (entry.file, entry.data))
            .collect();
        let expected: Vec<(String, String)> = project
            .files()
            .iter()
            .map(|file| (file.path.clone(), file.content.clone()))
            .collect();
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn constants_do_not_depend_on_project_contents() {
        for project in [
            Project::seed(),
            Project::new("one", [("index.html", "<p>hi</p>")]).expect("project"),
        ] {
            let request = DeployRequest::from_project(&project);
            assert!(request.public);
            assert_eq!(request.version, 2);
            assert_eq!(request.builds, default_builds());
            assert_eq!(request.files.len(), project.len());

            let body = parsed_body(&request);
            assert_eq!(body["builds"].as_array().map(Vec::len), Some(2));
            assert_eq!(body["public"], json!(true));
        }
    }

    #[test]
    fn compact_body_renders_one_file_per_line() {
        let project = Project::new("p", [("a.js", "1"), ("b.js", "2")]).expect("project");
        let body = DeployRequest::from_project(&project).to_body();

        assert!(body.contains("    { \"file\": \"a.js\", \"data\": \"1\" },\n"));
        assert!(body.contains("    { \"file\": \"b.js\", \"data\": \"2\" }\n  ],"));
        assert!(body.contains("    { \"use\": \"@now/static\" }\n  ]\n}"));
    }

    #[test]
    fn deploy_response_ignores_unknown_fields() {
        let response: DeployResponse = serde_json::from_str(
            r#"{"id":"dpl_1","url":"simple-now-deployment-abc.now.sh","readyState":"QUEUED","regions":["sfo1"]}"#,
        )
        .expect("decode");
        assert_eq!(response.url, "simple-now-deployment-abc.now.sh");
        assert_eq!(response.ready_state.as_deref(), Some("QUEUED"));
    }
}
