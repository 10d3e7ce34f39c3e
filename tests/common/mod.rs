// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed source and destination pair and a
// fluent builder so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chatmate::artifact::CHATMATE_SUFFIX;
use chatmate::commands::CommandSetup;
use chatmate::config::{Config, SourceSelection};
use chatmate::security::{DEFAULT_MAX_CONTENT_BYTES, SecurityPolicy};
use chatmate::source::DirectorySource;

/// A chatmate that passes header validation, described by `description`.
pub fn chatmate_text(description: &str) -> String {
    format!(
        "---\ndescription: {description}\nauthor: tests\ntools: [codebase]\n---\n\
         You are a focused assistant. Work through the task step by step and \
         explain each change you make.\n"
    )
}

/// An isolated source directory and destination directory backed by a
/// [`tempfile::TempDir`].
///
/// Both directories are deleted when the context is dropped.
pub struct TestEnv {
    /// Temporary directory holding `chatmates/` and `prompts/`.
    pub root: tempfile::TempDir,
    source: DirectorySource,
    policy: SecurityPolicy,
}

impl TestEnv {
    /// Start building an environment.
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    /// Directory the source reads from.
    pub fn source_dir(&self) -> PathBuf {
        self.root.path().join("chatmates")
    }

    /// Destination directory.
    pub fn dest(&self) -> PathBuf {
        self.root.path().join("prompts")
    }

    /// Directory-backed source over [`source_dir`](Self::source_dir).
    pub fn source(&self) -> &DirectorySource {
        &self.source
    }

    /// Policy with the configured content ceiling.
    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Command setup for this environment, with prompts disabled.
    pub fn setup(&self) -> CommandSetup {
        CommandSetup::from_config(Config {
            destination: self.dest(),
            source: SourceSelection::Directory(self.source_dir()),
            max_content_bytes: self.policy.max_content_bytes(),
            non_interactive: true,
        })
    }

    /// Filenames currently in the destination, sorted.
    pub fn dest_listing(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.dest()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.expect("read entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Content of the installed chatmate `name`, if present.
    pub fn installed(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.dest().join(format!("{name}{CHATMATE_SUFFIX}"))).ok()
    }

    /// Content of the source chatmate `name`.
    pub fn source_content(&self, name: &str) -> String {
        std::fs::read_to_string(self.source_dir().join(format!("{name}{CHATMATE_SUFFIX}")))
            .expect("read source chatmate")
    }

    /// Write a chatmate straight into the destination.
    pub fn install_by_hand(&self, name: &str, content: &str) {
        write_chatmate(&self.dest(), name, content);
    }
}

/// Fluent builder for [`TestEnv`].
#[derive(Default)]
pub struct TestEnvBuilder {
    chatmates: Vec<(String, String)>,
    installed: Vec<(String, String)>,
    max_content_bytes: Option<usize>,
}

impl TestEnvBuilder {
    /// Add a valid chatmate `name` to the source.
    pub fn chatmate(self, name: &str) -> Self {
        let content = chatmate_text(&format!("{name} mode"));
        self.chatmate_with(name, &content)
    }

    /// Add a chatmate with explicit content to the source.
    pub fn chatmate_with(mut self, name: &str, content: &str) -> Self {
        self.chatmates.push((name.to_string(), content.to_string()));
        self
    }

    /// Pre-populate the destination with `name`.
    pub fn installed(mut self, name: &str, content: &str) -> Self {
        self.installed.push((name.to_string(), content.to_string()));
        self
    }

    /// Override the content ceiling.
    pub fn max_content_bytes(mut self, max: usize) -> Self {
        self.max_content_bytes = Some(max);
        self
    }

    /// Create the directories and files.
    pub fn build(self) -> TestEnv {
        let root = tempfile::tempdir().expect("create temp dir");
        let source_dir = root.path().join("chatmates");
        std::fs::create_dir_all(&source_dir).expect("create source dir");
        for (name, content) in &self.chatmates {
            write_chatmate(&source_dir, name, content);
        }
        for (name, content) in &self.installed {
            write_chatmate(&root.path().join("prompts"), name, content);
        }

        TestEnv {
            source: DirectorySource::new(source_dir),
            policy: SecurityPolicy::new(
                self.max_content_bytes.unwrap_or(DEFAULT_MAX_CONTENT_BYTES),
            ),
            root,
        }
    }
}

fn write_chatmate(dir: &Path, name: &str, content: &str) {
    std::fs::create_dir_all(dir).expect("create dir");
    std::fs::write(dir.join(format!("{name}{CHATMATE_SUFFIX}")), content)
        .expect("write chatmate");
}
