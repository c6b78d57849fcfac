// music-box -- a text based music box for the terminal
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The interactive shell for inserting and playing cylinders.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::display::Display;
use crate::emitter::EmitterConfig;
use crate::engine::PlaybackEngine;
use crate::source::NotationSource;

/// Extension of playable cylinders.
const CYLINDER_EXTENSION: &str = ".txt";

/// Cylinders starting with this prefix are templates and not listed.
const TEMPLATE_PREFIX: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(String),
    /// `play` without a cylinder.
    MissingCylinder,
    List,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    /// Parse a line typed into the shell.
    ///
    /// # Examples
    ///
    /// ```
    /// use music_box::shell::Command;
    ///
    /// assert_eq!(Command::parse("  play  waltz.txt"), Command::Play("waltz.txt".into()));
    /// assert_eq!(Command::parse("ls"), Command::List);
    /// assert_eq!(Command::parse("\t"), Command::Empty);
    /// ```
    pub fn parse(input: &str) -> Command {
        let input = input.trim_matches(|ch: char| ch == ' ' || ch == '\t');
        match input {
            "" => Command::Empty,
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "h" | "?" => Command::Help,
            "list" | "ls" => Command::List,
            "play" => Command::MissingCylinder,
            _ => match input.strip_prefix("play ") {
                Some(name) => {
                    let name = name.trim_start_matches(|ch: char| ch == ' ' || ch == '\t');
                    if name.is_empty() {
                        Command::MissingCylinder
                    } else {
                        Command::Play(name.to_string())
                    }
                }
                None => Command::Unknown(input.to_string()),
            },
        }
    }
}

/// List the playable cylinders in `directory`, sorted by name.
pub fn list_cylinders(directory: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_cylinder(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn is_cylinder(name: &str) -> bool {
    name.len() > CYLINDER_EXTENSION.len()
        && name.ends_with(CYLINDER_EXTENSION)
        && !name.starts_with(TEMPLATE_PREFIX)
}

#[derive(Debug, Clone)]
pub struct ShellOptions {
    /// Where cylinders are listed and looked up.
    pub directory: PathBuf,
    /// Show the insertion animation and wait for the spring to be wound before playing.
    pub wind: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            directory: ".".into(),
            wind: true,
        }
    }
}

pub struct Shell {
    engine: PlaybackEngine,
    emitter: EmitterConfig,
    options: ShellOptions,
}

impl Shell {
    pub fn new(engine: PlaybackEngine, emitter: EmitterConfig, options: ShellOptions) -> Self {
        Self {
            engine,
            emitter,
            options,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// Read commands from `input` until the user quits or the input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        welcome(&mut out)?;
        help(&mut out)?;

        let mut line = String::new();
        loop {
            write!(out, "  > ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            let command = Command::parse(line.trim_end_matches(|ch: char| ch == '\n' || ch == '\r'));
            debug!("shell command {:?}", command);
            match command {
                Command::Empty => {}
                Command::Quit => {
                    write!(out, "\n  Closing the music box. Goodbye!\n\n")?;
                    break;
                }
                Command::Help => help(&mut out)?,
                Command::List => self.list(&mut out)?,
                Command::MissingCylinder => {
                    write!(out, "\n  Error: No cylinder specified.\n  Usage: play <filename>\n\n")?
                }
                Command::Play(name) => {
                    if self.options.wind {
                        self.wind(&mut input, &mut out)?;
                    }
                    self.play(&name, &mut out)?;
                    writeln!(out)?;
                }
                Command::Unknown(_) => {
                    write!(out, "\n  Unknown command. Type 'help' for commands.\n\n")?
                }
            }
        }
        Ok(())
    }

    fn list<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "\n  Available Cylinders:\n")?;
        writeln!(out, "  ------------------------------------")?;
        let cylinders = match list_cylinders(&self.options.directory) {
            Ok(cylinders) => cylinders,
            Err(err) => {
                warn!(
                    "cannot list {}: {}",
                    self.options.directory.display(),
                    err
                );
                Vec::new()
            }
        };
        if cylinders.is_empty() {
            writeln!(out, "  No .txt song files found.")?;
            write!(out, "  Create a .txt file in this folder!\n\n")?;
        } else {
            for name in &cylinders {
                writeln!(out, "  * {}", name)?;
            }
            write!(out, "\n  Play with: play <filename>\n\n")?;
        }
        Ok(())
    }

    fn wind<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<()> {
        write!(out, "\n  Inserting cylinder")?;
        for _ in 0..3 {
            write!(out, ".")?;
            out.flush()?;
            thread::sleep(Duration::from_millis(300));
        }
        writeln!(out, " OK")?;
        write!(out, "\n  >> Wind the spring (press ENTER)...\n  ")?;
        out.flush()?;
        let mut ignored = String::new();
        input.read_line(&mut ignored)?;
        Ok(())
    }

    /// Play a single cylinder. Failures are reported and do not end the shell.
    fn play<W: Write>(&mut self, name: &str, out: &mut W) -> io::Result<()> {
        let path = self.options.directory.join(name);
        // open the cylinder before sox creates an output file
        let source = match NotationSource::open(&path) {
            Ok(source) => source,
            Err(err) => {
                writeln!(out, "\n  Error: {}", err)?;
                writeln!(out, "  Make sure the file exists and the path is correct.")?;
                return Ok(());
            }
        };
        let mut emitter = match self.emitter.build() {
            Ok(emitter) => emitter,
            Err(err) => {
                writeln!(
                    out,
                    "\n  Error: Cannot start the {} emitter: {}",
                    self.emitter.effective_kind(),
                    err
                )?;
                return Ok(());
            }
        };
        writeln!(out)?;
        let mut display = Display::new(&mut *out);
        if let Err(err) = self.engine.play(source, &mut *emitter, &mut display) {
            writeln!(out, "\n  Error: {}", err)?;
        }
        Ok(())
    }
}

fn welcome<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\n+====================================+\n")?;
    writeln!(out, "|      ** MUSIC BOX **               |")?;
    writeln!(out, "|      Terminal Edition              |")?;
    write!(out, "+====================================+\n\n")
}

fn help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "  Commands:")?;
    writeln!(out, "  ------------------------------------")?;
    writeln!(out, "  play <file>  - Insert and play cylinder")?;
    writeln!(out, "  list         - Show available cylinders")?;
    writeln!(out, "  help         - Show this help")?;
    write!(out, "  quit         - Close the music box\n\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::emitter::EmitterKind;

    /// A scratch directory removed again when dropped.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("music-box-{}-{}", std::process::id(), name));
            fs::create_dir_all(&path).unwrap();
            ScratchDir(path)
        }

        fn add(&self, name: &str, contents: &str) {
            fs::write(self.0.join(name), contents).unwrap();
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn shell(directory: &Path) -> Shell {
        Shell::new(
            PlaybackEngine::new(),
            EmitterConfig {
                kind: EmitterKind::Silent,
                ..EmitterConfig::default()
            },
            ShellOptions {
                directory: directory.to_path_buf(),
                wind: false,
            },
        )
    }

    fn run(shell: &mut Shell, input: &str) -> String {
        let mut out = Vec::new();
        shell.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse(" exit "), Command::Quit);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("h"), Command::Help);
        assert_eq!(Command::parse("list"), Command::List);
        assert_eq!(Command::parse("play"), Command::MissingCylinder);
        assert_eq!(Command::parse("play   "), Command::MissingCylinder);
        assert_eq!(
            Command::parse("play my song.txt"),
            Command::Play("my song.txt".into())
        );
        assert_eq!(Command::parse("dance"), Command::Unknown("dance".into()));
        assert_eq!(Command::parse("playing"), Command::Unknown("playing".into()));
    }

    #[test]
    fn cylinder_names() {
        assert!(is_cylinder("waltz.txt"));
        assert!(!is_cylinder(".txt"));
        assert!(!is_cylinder("_template.txt"));
        assert!(!is_cylinder("notes.md"));
        assert!(!is_cylinder("waltz.txt.bak"));
    }

    #[test]
    fn lists_sorted_cylinders() {
        let dir = ScratchDir::new("list");
        dir.add("waltz.txt", "Waltz\n");
        dir.add("anthem.txt", "Anthem\n");
        dir.add("_template.txt", "Template\n");
        dir.add("readme.md", "not a song\n");
        fs::create_dir_all(dir.0.join("folder.txt")).unwrap();
        assert_eq!(
            list_cylinders(&dir.0).unwrap(),
            vec!["anthem.txt".to_string(), "waltz.txt".to_string()]
        );
    }

    #[test]
    fn bundled_songs() {
        let songs = Path::new(env!("CARGO_MANIFEST_DIR")).join("songs");
        assert_eq!(list_cylinders(&songs).unwrap(), vec!["twinkle.txt".to_string()]);
    }

    #[test]
    fn session() {
        let dir = ScratchDir::new("session");
        dir.add("tune.txt", "Tune\nT150\nCDE\n");
        let mut shell = shell(&dir.0);
        let out = run(&mut shell, "list\n\nplay\ndance\nplay tune.txt\nplay gone.txt\nquit\nlist\n");

        assert!(out.contains("  * tune.txt\n"));
        assert!(out.contains("Error: No cylinder specified."));
        assert!(out.contains("Unknown command."));
        assert!(out.contains("|  Tune "));
        assert!(out.contains("[Tempo: 150 BPM]"));
        assert!(out.contains(" C  D  E "));
        assert!(out.contains("Music box finished."));
        assert!(out.contains("Error: Cannot open file"));
        assert!(out.ends_with("Closing the music box. Goodbye!\n\n"));
        assert_eq!(out.matches("Available Cylinders").count(), 1);
        assert_eq!(shell.engine().tempo().bpm(), 150);
    }

    #[test]
    fn missing_cylinder_does_not_start_emitter() {
        let dir = ScratchDir::new("missing");
        let rendered = dir.0.join("out.wav");
        let mut shell = Shell::new(
            PlaybackEngine::new(),
            EmitterConfig {
                output: Some(rendered.clone()),
                ..EmitterConfig::default()
            },
            ShellOptions {
                directory: dir.0.clone(),
                wind: false,
            },
        );
        let out = run(&mut shell, "play gone.txt\nquit\n");
        assert!(out.contains("Error: Cannot open file"));
        assert!(!out.contains("Cannot start the sox emitter"));
        assert!(!rendered.exists());
    }

    #[test]
    fn empty_directory() {
        let dir = ScratchDir::new("empty");
        let out = run(&mut shell(&dir.0), "ls\n");
        assert!(out.contains("No .txt song files found."));
    }

    #[test]
    fn winding_waits_for_enter() {
        let dir = ScratchDir::new("wind");
        dir.add("tune.txt", "Tune\nC\n");
        let mut shell = shell(&dir.0);
        shell.options.wind = true;
        // the empty line winds the spring, it is not read as a command
        let out = run(&mut shell, "play tune.txt\n\nquit\n");
        assert!(out.contains("Inserting cylinder... OK"));
        assert!(out.contains("Wind the spring"));
        assert!(out.contains("Music box finished."));
        assert!(out.contains("Goodbye!"));
    }
}
