use crate::session::{Config, SessionLog};
use crate::sync::MockRsyncOps;
use crate::window::controller::*;
use std::fs;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use tempfile::TempDir;

fn mock_output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("a")).unwrap();
        fs::create_dir(root.path().join("b")).unwrap();
        fs::write(root.path().join("b").join("old.txt"), "old").unwrap();
        fs::write(root.path().join("b").join("older.txt"), "older").unwrap();
        Self { root }
    }

    fn source(&self) -> PathBuf {
        self.root.path().join("a")
    }

    fn destination(&self) -> PathBuf {
        self.root.path().join("b")
    }

    fn config_path(&self) -> PathBuf {
        self.root.path().join("config").join("arxive")
    }

    fn controller(&self, rsync: MockRsyncOps) -> WindowController<MockRsyncOps> {
        let mut controller =
            WindowController::new(rsync, SessionLog::new(), Config::default(), self.config_path());
        controller.choose_source(&self.source());
        controller.choose_destination(&self.destination());
        controller
    }
}

fn listing_rsync() -> MockRsyncOps {
    let mut rsync = MockRsyncOps::new();
    rsync
        .expect_dry_run_delete()
        .returning(|_, _| Ok(mock_output(0, "deleting old.txt\ndeleting older.txt\n", "")));
    rsync
}

#[test]
fn test_new_uses_config_defaults() {
    let config = Config {
        source: "/tmp/a".to_string(),
        destination: "/tmp/b".to_string(),
        options: Some(vec!["--progress".to_string()]),
        abort_on_sync_failure: false,
    };
    let controller = WindowController::new(
        MockRsyncOps::new(),
        SessionLog::new(),
        config,
        PathBuf::from("/tmp/unused"),
    );

    assert_eq!(controller.source(), "/tmp/a");
    assert_eq!(controller.destination(), "/tmp/b");
    assert!(!controller.sync_enabled());
}

#[test]
fn test_choose_directory_logs_and_disables_sync() {
    let fixture = Fixture::new();
    let controller = fixture.controller(MockRsyncOps::new());

    let console = controller.console();
    assert!(console[0].text.starts_with("Source: "));
    assert!(console[1].text.starts_with("Destination: "));
    assert!(!controller.sync_enabled());
    assert_eq!(controller.status(), "Ready.");
}

#[test]
fn test_list_deletions_fills_unchecked_checklist() {
    let fixture = Fixture::new();
    let mut controller = fixture.controller(listing_rsync());

    assert!(controller.list_deletions());

    assert_eq!(
        controller.candidates(),
        [
            Candidate {
                path: PathBuf::from("old.txt"),
                checked: false
            },
            Candidate {
                path: PathBuf::from("older.txt"),
                checked: false
            },
        ]
    );
    assert!(controller.sync_enabled());
}

#[test]
fn test_list_deletions_rejects_identical_paths() {
    let fixture = Fixture::new();
    let mut rsync = MockRsyncOps::new();
    rsync.expect_dry_run_delete().never();
    let mut controller = fixture.controller(rsync);
    controller.choose_destination(&fixture.source());

    assert!(!controller.list_deletions());

    let last = controller.console().pop().unwrap();
    assert_eq!(last.tone, Tone::Error);
    assert!(last.text.contains("must be different"));
    assert!(!controller.sync_enabled());
}

#[test]
fn test_run_sync_deletes_only_checked() {
    let fixture = Fixture::new();
    let mut rsync = listing_rsync();
    rsync
        .expect_mirror()
        .times(1)
        .returning(|_, _, _| Ok(mock_output(0, "sending incremental file list\n", "")));
    let mut controller = fixture.controller(rsync);

    controller.list_deletions();
    controller.set_checked(0, true);
    controller.set_checked(99, true);

    assert_eq!(controller.run_sync(), Some(0));

    assert!(!fixture.destination().join("old.txt").exists());
    assert!(fixture.destination().join("older.txt").exists());
    assert_eq!(controller.deleted(), 1);
    assert!(controller.candidates().is_empty());
    assert!(!controller.sync_enabled());
    let console = controller.console();
    assert_eq!(console.last().unwrap().tone, Tone::Success);
}

#[test]
fn test_run_sync_stderr_lines_are_warnings() {
    let fixture = Fixture::new();
    let mut rsync = listing_rsync();
    rsync.expect_mirror().returning(|_, _, _| {
        Ok(mock_output(
            0,
            "sending incremental file list\n",
            "rsync: some attrs were not transferred\nrsync error: partial transfer\n",
        ))
    });
    let mut controller = fixture.controller(rsync);

    controller.list_deletions();
    assert_eq!(controller.run_sync(), Some(0));

    let console = controller.console();
    let tone_of = |text: &str| console.iter().find(|l| l.text == text).unwrap().tone;
    assert_eq!(tone_of("sending incremental file list"), Tone::Normal);
    assert_eq!(tone_of("rsync: some attrs were not transferred"), Tone::Warning);
    assert_eq!(tone_of("rsync error: partial transfer"), Tone::Error);
}

#[test]
fn test_run_sync_requires_listing_first() {
    let fixture = Fixture::new();
    let mut rsync = MockRsyncOps::new();
    rsync.expect_mirror().never();
    let mut controller = fixture.controller(rsync);

    assert_eq!(controller.run_sync(), None);
    assert_eq!(controller.console().pop().unwrap().tone, Tone::Warning);
}

#[test]
fn test_run_sync_reports_exit_code() {
    let fixture = Fixture::new();
    let mut rsync = listing_rsync();
    rsync
        .expect_mirror()
        .returning(|_, _, _| Ok(mock_output(24, "", "")));
    let mut controller = fixture.controller(rsync);

    controller.list_deletions();
    controller.check_all(true);

    assert_eq!(controller.run_sync(), Some(24));
    assert_eq!(controller.deleted(), 2);
    assert_eq!(controller.status(), "rsync exited with code 24.");
}

#[test]
fn test_save_config_persists_and_applies() {
    let fixture = Fixture::new();
    let mut rsync = listing_rsync();
    rsync
        .expect_mirror()
        .withf(|_, _, options| options.len() == 1 && options[0] == "--progress")
        .returning(|_, _, _| Ok(mock_output(0, "", "")));
    let mut controller = fixture.controller(rsync);

    let form = ConfigForm {
        source: fixture.source().to_string_lossy().into_owned(),
        destination: fixture.destination().to_string_lossy().into_owned(),
        options: "--progress, -v".to_string(),
    };
    controller.save_config(&form).unwrap();

    let saved = Config::load(&fixture.config_path()).unwrap();
    assert_eq!(saved.options, Some(vec!["--progress".to_string()]));
    assert_eq!(
        controller.open_config(),
        ConfigForm {
            options: "--progress".to_string(),
            ..form
        }
    );
    assert!(
        controller
            .console()
            .iter()
            .any(|l| l.tone == Tone::Warning && l.text.contains("default options"))
    );

    controller.list_deletions();
    controller.run_sync();
}

#[test]
fn test_save_config_write_failure() {
    let fixture = Fixture::new();
    let blocker = fixture.root.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();
    let mut controller = WindowController::new(
        MockRsyncOps::new(),
        SessionLog::new(),
        Config::default(),
        blocker.join("arxive"),
    );

    let result = controller.save_config(&ConfigForm::default());

    assert!(result.is_err());
    assert_eq!(controller.console().pop().unwrap().tone, Tone::Error);
}

#[test]
fn test_about_and_exit() {
    let mut controller = WindowController::new(
        MockRsyncOps::new(),
        SessionLog::new(),
        Config::default(),
        Path::new("/tmp/unused").to_path_buf(),
    );

    let about = controller.about();
    assert_eq!(about.version, env!("CARGO_PKG_VERSION"));
    assert!(about.description.contains("rsync"));

    controller.exit();
    assert!(controller.exit_requested());
}
