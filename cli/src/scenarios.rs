use std::path::{Path, PathBuf};

use agentchat_core::Coordinator;

/// `(file name, prompt)` for each scenario, in the order they run. They share
/// one coordinator so later prompts can draw on earlier answers.
pub const SCENARIOS: &[(&str, &str)] = &[
    ("simple_query.txt", "What are the main types of neural networks?"),
    (
        "complex_query.txt",
        "Research transformer architectures, analyze their computational efficiency, and summarize key trade-offs.",
    ),
    ("memory_test.txt", "What did we discuss about neural networks earlier?"),
    (
        "multi_step.txt",
        "Find recent papers on reinforcement learning, analyze their methodologies, and identify common challenges.",
    ),
    (
        "collaborative.txt",
        "Compare two machine-learning approaches and recommend which is better for our use case.",
    ),
];

/// Run every scenario and write `User: ...\n\nManager:\n...\n` transcripts
/// into `out_dir`. Returns the paths written.
pub async fn run_scenarios(coordinator: &mut Coordinator, out_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(SCENARIOS.len());
    for (file_name, prompt) in SCENARIOS {
        let answer = coordinator.handle_user_query(prompt).await;
        let path = out_dir.join(file_name);
        std::fs::write(&path, format!("User: {prompt}\n\nManager:\n{answer}\n"))?;
        tracing::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentchat_core::Config;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_one_transcript_per_scenario() {
        let tmp = TempDir::new().unwrap();
        let config = Config { log_dir: tmp.path().join("logs"), ..Config::default() };
        let mut co = Coordinator::new(&config).unwrap().with_chat_model(None);
        let out = tmp.path().join("out");

        let written = run_scenarios(&mut co, &out).await.unwrap();
        assert_eq!(written.len(), 5);

        let simple = std::fs::read_to_string(out.join("simple_query.txt")).unwrap();
        assert!(simple.starts_with("User: What are the main types of neural networks?\n\nManager:\nMain findings:\n"));
        assert!(simple.ends_with('\n'));

        let memory = std::fs::read_to_string(out.join("memory_test.txt")).unwrap();
        assert!(memory.contains("Here's what I found in memory:"));

        let collab = std::fs::read_to_string(out.join("collaborative.txt")).unwrap();
        assert!(collab.contains("Manager:\nComparison:\n"));
    }
}
