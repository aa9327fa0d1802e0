//! Line-oriented front-end over a [`ProjectService`].
//!
//! - Lines starting with `#` are commands
//! - Any other line is prose, appended to the project content
//!
//! Every response line starts with a bracketed tag (`[SAVED]`, `[ERROR]`,
//! ...) so scripts can parse the output.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use storyloom_core::{CharacterId, LocationId, ProjectService};

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Startup options parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    pub projects_dir: Option<PathBuf>,
    pub open: Option<PathBuf>,
    pub title: Option<String>,
    pub help: bool,
}

/// Parse shell options from command line arguments.
pub fn parse_options_from_args(args: &[String]) -> ShellOptions {
    let mut options = ShellOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--projects-dir" => {
                if let Some(dir) = args.get(i + 1) {
                    options.projects_dir = Some(PathBuf::from(dir));
                    i += 1;
                }
            }
            "--open" => {
                if let Some(path) = args.get(i + 1) {
                    options.open = Some(PathBuf::from(path));
                    i += 1;
                }
            }
            "--title" => {
                if let Some(title) = args.get(i + 1) {
                    options.title = Some(title.clone());
                    i += 1;
                }
            }
            "--help" | "-h" => options.help = true,
            _ => {}
        }
        i += 1;
    }

    options
}

/// Read lines from `input` until EOF or `#quit`.
pub fn run_shell(
    service: &mut ProjectService,
    input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    print_banner(service, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if handle_line(service, line, &mut out)? == Flow::Quit {
            break;
        }
        out.flush()?;
    }

    Ok(())
}

/// Handle one line of input.
pub fn handle_line(service: &mut ProjectService, line: &str, out: &mut impl Write) -> io::Result<Flow> {
    let Some(command) = line.strip_prefix('#') else {
        write_prose(service, line, out)?;
        return Ok(Flow::Continue);
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => {
            writeln!(out, "Goodbye!")?;
            return Ok(Flow::Quit);
        }
        "help" => print_help(out)?,
        "new" => {
            let project = if rest.is_empty() {
                service.create_untitled_project()
            } else {
                service.create_project(rest)
            };
            writeln!(out, "[NEW] {} ({})", project.title, project.id)?;
        }
        "open" => {
            if rest.is_empty() {
                writeln!(out, "[ERROR] Usage: #open <path>")?;
            } else {
                match service.open_project(rest) {
                    Ok(project) => writeln!(
                        out,
                        "[OPENED] {} - {} characters, {} locations, {} scenes",
                        project.title,
                        project.characters.len(),
                        project.locations.len(),
                        project.scenes.len()
                    )?,
                    Err(e) => writeln!(out, "[ERROR] Open failed: {e}")?,
                }
            }
        }
        "save" => match service.save_project() {
            Ok(path) => writeln!(out, "[SAVED] {}", path.display())?,
            Err(e) => writeln!(out, "[ERROR] Save failed: {e}")?,
        },
        "list" => match service.list_projects() {
            Ok(projects) if projects.is_empty() => writeln!(out, "[LIST] (no projects)")?,
            Ok(projects) => {
                writeln!(out, "[LIST]")?;
                for p in projects {
                    writeln!(
                        out,
                        "  {} - {} ({} characters)",
                        p.title,
                        p.path.display(),
                        p.character_count
                    )?;
                }
            }
            Err(e) => writeln!(out, "[ERROR] List failed: {e}")?,
        },
        "status" => print_status(service, out)?,
        "characters" => {
            writeln!(out, "[CHARACTERS]")?;
            for c in service.get_characters() {
                if c.role.is_empty() {
                    writeln!(out, "  {} {}", c.id, c.name)?;
                } else {
                    writeln!(out, "  {} {} ({})", c.id, c.name, c.role)?;
                }
            }
        }
        "locations" => {
            writeln!(out, "[LOCATIONS]")?;
            for l in service.get_locations() {
                writeln!(out, "  {} {}", l.id, l.name)?;
            }
        }
        "scenes" => {
            writeln!(out, "[SCENES]")?;
            for s in service.scenes_in_order() {
                writeln!(out, "  {} #{} {}", s.id, s.order_index, s.title)?;
            }
        }
        "add-character" => {
            if rest.is_empty() {
                writeln!(out, "[ERROR] Usage: #add-character <name>")?;
            } else {
                let character = service.new_character(rest);
                let id = character.id.clone();
                if service.add_character(character) {
                    writeln!(out, "[ADDED] character {id} {rest}")?;
                } else {
                    writeln!(out, "[ERROR] Character not added (duplicate name or no project)")?;
                }
            }
        }
        "remove-character" => {
            if service.remove_character(&CharacterId::new(rest)) {
                writeln!(out, "[REMOVED] character {rest}")?;
            } else {
                writeln!(out, "[ERROR] No project")?;
            }
        }
        "add-location" => {
            if rest.is_empty() {
                writeln!(out, "[ERROR] Usage: #add-location <name>")?;
            } else {
                let location = service.new_location(rest);
                let id = location.id.clone();
                if service.add_location(location) {
                    writeln!(out, "[ADDED] location {id} {rest}")?;
                } else {
                    writeln!(out, "[ERROR] No project")?;
                }
            }
        }
        "remove-location" => {
            if service.remove_location(&LocationId::new(rest)) {
                writeln!(out, "[REMOVED] location {rest}")?;
            } else {
                writeln!(out, "[ERROR] No project")?;
            }
        }
        "add-scene" => {
            if rest.is_empty() {
                writeln!(out, "[ERROR] Usage: #add-scene <title>")?;
            } else {
                let order = service.get_scenes().len() as i64;
                let scene = service.new_scene(rest).with_order_index(order);
                let id = scene.id.clone();
                if service.add_scene(scene) {
                    writeln!(out, "[ADDED] scene {id} {rest}")?;
                } else {
                    writeln!(out, "[ERROR] No project")?;
                }
            }
        }
        "connect" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(a), Some(b)) => {
                    let reason = parts.collect::<Vec<_>>().join(" ");
                    if service.connect_entities(a, b, reason) {
                        writeln!(out, "[CONNECTED] {a} <-> {b}")?;
                    } else {
                        writeln!(out, "[ERROR] No project")?;
                    }
                }
                _ => writeln!(out, "[ERROR] Usage: #connect <id> <id> [reason]")?,
            }
        }
        "links" => {
            writeln!(out, "[LINKS] {rest}")?;
            for c in service.connections_for(rest) {
                if c.reason.is_empty() {
                    writeln!(out, "  {}", c.other_id)?;
                } else {
                    writeln!(out, "  {} ({})", c.other_id, c.reason)?;
                }
            }
        }
        _ => writeln!(out, "[ERROR] Unknown command. Type #help for help.")?,
    }

    Ok(Flow::Continue)
}

/// Append prose to the project and report newly detected characters.
fn write_prose(service: &mut ProjectService, line: &str, out: &mut impl Write) -> io::Result<()> {
    let Some(project) = service.active_project() else {
        writeln!(out, "[ERROR] No project. Use #new <title> or #open <path>.")?;
        return Ok(());
    };

    let content = if project.content.is_empty() {
        line.to_string()
    } else {
        format!("{}\n{}", project.content, line)
    };

    let added = service.sync_characters_from_text(&content);
    if !added.is_empty() {
        let names: Vec<_> = added.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "[DETECTED] {}", names.join(", "))?;
    }
    Ok(())
}

fn print_banner(service: &ProjectService, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=== Storyloom ===")?;
    writeln!(out, "Projects: {}", service.projects_dir().display())?;
    if let Some(project) = service.active_project() {
        writeln!(out, "Project: {}", project.title)?;
    }
    writeln!(out, "Type #help for commands; anything else is story text.")?;
    writeln!(out)
}

fn print_status(service: &ProjectService, out: &mut impl Write) -> io::Result<()> {
    let Some(project) = service.active_project() else {
        return writeln!(out, "[STATUS] No project");
    };

    writeln!(out, "[STATUS]")?;
    writeln!(out, "  Title: {}", project.title)?;
    writeln!(out, "  Id: {}", project.id)?;
    match &project.file_path {
        Some(path) => writeln!(out, "  File: {}", path.display())?,
        None => writeln!(out, "  File: (unsaved)")?,
    }
    writeln!(out, "  Words: {}", project.content.split_whitespace().count())?;
    writeln!(out, "  Characters: {}", project.characters.len())?;
    writeln!(out, "  Locations: {}", project.locations.len())?;
    writeln!(out, "  Scenes: {}", project.scenes.len())?;
    writeln!(out, "  Updated: {}", project.updated_at.to_rfc3339())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[HELP]")?;
    writeln!(out, "  #new [title]             - Start a new project")?;
    writeln!(out, "  #open <path>             - Open a project file")?;
    writeln!(out, "  #save                    - Save the current project")?;
    writeln!(out, "  #list                    - List saved projects")?;
    writeln!(out, "  #status                  - Show project status")?;
    writeln!(out, "  #characters              - List characters")?;
    writeln!(out, "  #locations               - List locations")?;
    writeln!(out, "  #scenes                  - List scenes in order")?;
    writeln!(out, "  #add-character <name>    - Add a character")?;
    writeln!(out, "  #remove-character <id>   - Remove a character")?;
    writeln!(out, "  #add-location <name>     - Add a location")?;
    writeln!(out, "  #remove-location <id>    - Remove a location")?;
    writeln!(out, "  #add-scene <title>       - Add a scene at the end")?;
    writeln!(out, "  #connect <a> <b> [why]   - Link two entity ids")?;
    writeln!(out, "  #links <id>              - Show links of an entity")?;
    writeln!(out, "  #quit                    - Exit")?;
    writeln!(out, "  (anything else is appended to the story)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::testing::test_service;
    use tempfile::TempDir;

    fn run(service: &mut ProjectService, script: &str) -> String {
        let mut out = Vec::new();
        run_shell(service, script.as_bytes(), &mut out).expect("shell should not fail");
        String::from_utf8(out).expect("output is utf-8")
    }

    #[test]
    fn test_parse_options() {
        let args: Vec<String> = ["storyloom", "--projects-dir", "/tmp/p", "--title", "Saga", "--open"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = parse_options_from_args(&args);
        assert_eq!(options.projects_dir, Some(PathBuf::from("/tmp/p")));
        assert_eq!(options.title.as_deref(), Some("Saga"));
        assert!(options.open.is_none());
        assert!(!options.help);
    }

    #[test]
    fn test_prose_detects_characters() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());
        service.create_project("Shell Story");

        let output = run(&mut service, "Alice met Bob.\nBob and Charlie are friends.\n");
        assert!(output.contains("[DETECTED] Alice, Bob\n"), "{output}");
        assert!(output.contains("[DETECTED] Charlie\n"), "{output}");
        assert_eq!(
            service.active_project().map(|p| p.content.as_str()),
            Some("Alice met Bob.\nBob and Charlie are friends.")
        );
    }

    #[test]
    fn test_prose_without_project() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());

        let output = run(&mut service, "Alice met Bob.\n#save\n");
        assert!(output.contains("[ERROR] No project."), "{output}");
        assert!(output.contains("[ERROR] Save failed: No active project"), "{output}");
    }

    #[test]
    fn test_save_and_open_commands() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());

        let output = run(
            &mut service,
            "#new My Story\n#add-location Rivendell\nGandalf arrived.\n#save\n#quit\nIgnored Text\n",
        );
        let saved = temp_dir.path().join("My_Story.story");
        assert!(output.contains(&format!("[SAVED] {}", saved.display())), "{output}");
        assert!(!output.contains("Ignored"), "{output}");

        let mut other = test_service(temp_dir.path());
        let output = run(&mut other, &format!("#open {}\n#characters\n", saved.display()));
        assert!(output.contains("[OPENED] My Story - 1 characters, 1 locations, 0 scenes"), "{output}");
        assert!(output.contains("Gandalf"), "{output}");
    }

    #[test]
    fn test_connect_and_links() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());
        service.create_project("Links");

        let output = run(&mut service, "#connect a b old friends\n#links b\n#connect a\n");
        assert!(output.contains("[CONNECTED] a <-> b"), "{output}");
        assert!(output.contains("  a (old friends)"), "{output}");
        assert!(output.contains("[ERROR] Usage: #connect"), "{output}");
    }

    #[test]
    fn test_connect_tolerates_extra_spaces() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());
        service.create_project("Spacing");

        let output = run(&mut service, "#connect a   b  sworn   enemies\n");
        assert!(output.contains("[CONNECTED] a <-> b"), "{output}");
        assert!(service.connections_for("").is_empty());
        assert_eq!(service.connections_for("a")[0].other_id, "b");
        assert_eq!(service.connections_for("a")[0].reason, "sworn enemies");
    }

    #[test]
    fn test_duplicate_character_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());
        service.create_project("Dupes");

        let output = run(&mut service, "#add-character Frodo\n#add-character Frodo\n");
        assert!(output.contains("[ADDED] character id-2 Frodo"), "{output}");
        assert!(output.contains("[ERROR] Character not added"), "{output}");
        assert_eq!(service.get_characters().len(), 1);
    }

    #[test]
    fn test_unknown_command() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut service = test_service(temp_dir.path());
        let output = run(&mut service, "#dance\n");
        assert!(output.contains("[ERROR] Unknown command"), "{output}");
    }
}
