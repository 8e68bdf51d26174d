use assert_cmd::Command;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug)]
pub struct PagOffRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl PagOffRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// A temporary `repos_dir` plus a config file pointing at it.
pub struct PagOffWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub repos_dir: PathBuf,
    pub config_path: PathBuf,
}

impl PagOffWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let repos_dir = root.join("repos");
        fs::create_dir_all(&repos_dir).expect("repos dir");
        let config_path = root.join("pag-off.yaml");
        fs::write(
            &config_path,
            format!(
                "main:\n  repos_dir: {}\nuser:\n  name: alice\n  default_email: alice@example.com\n",
                repos_dir.display()
            ),
        )
        .expect("write config");
        Self {
            temp_dir,
            root,
            repos_dir,
            config_path,
        }
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.repos_dir.join("tickets").join(project)
    }

    /// Write `ticket` as the file `name` of `project`.
    pub fn write_ticket(&self, project: &str, name: &str, ticket: &Value) -> PathBuf {
        let dir = self.project_dir(project);
        fs::create_dir_all(&dir).expect("project dir");
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(ticket).expect("json")).expect("write ticket");
        path
    }
}

/// A ticket document as the tracker writes it.
pub fn ticket_json(id: i64, title: &str, status: &str, tags: &[&str]) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "content": format!("Body of {title}"),
        "status": status,
        "close_status": null,
        "priority": null,
        "milestone": null,
        "private": false,
        "tags": tags,
        "blocks": [],
        "depends": [],
        "date_created": "1489130000",
        "last_updated": "1489130000",
        "closed_at": null,
        "user": {"name": "bob", "default_email": "bob@example.com"},
        "assignee": null,
        "comments": [],
        "custom_fields": []
    })
}

pub fn run_pag_off<I, S>(workspace: &PagOffWorkspace, args: I) -> PagOffRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_pag_off_with_input(workspace, args, "")
}

/// Run the binary with `--no-pull` and `input` on stdin.
pub fn run_pag_off_with_input<I, S>(workspace: &PagOffWorkspace, args: I, input: &str) -> PagOffRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_pag_off_inner(workspace, args, input, false)
}

/// Run the binary letting it `git pull --rebase` first.
pub fn run_pag_off_pulling<I, S>(workspace: &PagOffWorkspace, args: I, input: &str) -> PagOffRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_pag_off_inner(workspace, args, input, true)
}

fn run_pag_off_inner<I, S>(workspace: &PagOffWorkspace, args: I, input: &str, pull: bool) -> PagOffRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pag-off"));
    cmd.current_dir(&workspace.root);
    if !pull {
        cmd.arg("--no-pull");
    }
    cmd.args(args);
    cmd.env("PAG_OFF_CONFIG", &workspace.config_path);
    cmd.env("PAG_OFF_LOG", "warn");
    cmd.env("HOME", &workspace.root);
    cmd.write_stdin(input.to_string());

    let output = cmd.output().expect("run pag-off");
    PagOffRun {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
    }
}
