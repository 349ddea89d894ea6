use clap::Subcommand;
use harness_core::{
    baseline::DetectedTestRunner,
    context::Sources,
    hook::{self, HookEvent, HookInput, HookOutput},
    init_script::ShellInitScript,
    vcs::GitCli,
};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Subcommand, Clone, Copy)]
pub enum HookSubcommand {
    /// Gate Edit/Write tool calls against the feature checklist
    PreToolUse,
    /// Emit the session context report
    SessionStart,
    /// Emit a checkpoint reminder when the turn leaves uncommitted work
    Stop,
}

impl HookSubcommand {
    fn event(self) -> HookEvent {
        match self {
            HookSubcommand::PreToolUse => HookEvent::PreToolUse,
            HookSubcommand::SessionStart => HookEvent::SessionStart,
            HookSubcommand::Stop => HookEvent::Stop,
        }
    }
}

pub fn run(root: &Path, subcmd: HookSubcommand) -> anyhow::Result<()> {
    let raw = read_stdin();
    let output = respond(root, subcmd, &raw);
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.to_json())?;
    stdout.flush()?;
    Ok(())
}

fn read_stdin() -> String {
    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        tracing::warn!(error = %e, "could not read hook input");
        raw.clear();
    }
    raw
}

fn respond(root: &Path, subcmd: HookSubcommand, raw: &str) -> HookOutput {
    let event = subcmd.event();
    hook::guarded(event, || {
        let input = HookInput::parse(raw);
        match subcmd {
            HookSubcommand::PreToolUse => hook::pre_tool_use(root, &input),
            HookSubcommand::SessionStart => {
                let vcs = GitCli::new(root);
                let init_script = ShellInitScript::new(root);
                let tests = DetectedTestRunner::new(root);
                let sources = Sources {
                    vcs: &vcs,
                    init_script: &init_script,
                    tests: &tests,
                };
                hook::session_start(root, sources, chrono::Local::now())
            }
            HookSubcommand::Stop => hook::stop(root, &input, &GitCli::new(root)),
        }
    })
}
