use std::io::{BufRead, Write};

use agentchat_core::Coordinator;

const BANNER: &str = "Multi-agent chat. Type 'exit' to quit.";
const PROMPT: &str = "You: ";

/// Read queries line by line until `exit`/`quit` or end of input, answering
/// each one. Blank lines are skipped.
pub async fn run_chat<R, W>(coordinator: &mut Coordinator, input: R, out: &mut W) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "{BANNER}\n")?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let query = line?;
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        let answer = coordinator.handle_user_query(query).await;
        writeln!(out, "\nManager: {answer}\n")?;
    }
    Ok(())
}
