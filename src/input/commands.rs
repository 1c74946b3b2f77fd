pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "item",
        aliases: &["i"],
        description: "Open another item (e.g. :item pcbas/42)",
    },
    CommandDef {
        name: "page",
        aliases: &["pg"],
        description: "Jump to a page of the log (e.g. :page 3)",
    },
    CommandDef {
        name: "trace",
        aliases: &["tr"],
        description: "Switch to traceability view",
    },
    CommandDef {
        name: "stock",
        aliases: &["st"],
        description: "Switch to stock view",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit bomtrace",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

/// Resolves an exact command name or alias.
pub fn resolve_command(input: &str) -> Option<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == input_lower || cmd.aliases.contains(&input_lower.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_commands() {
        assert_eq!(matching_commands("i").len(), 1);
        assert_eq!(matching_commands("i")[0].name, "item");

        assert_eq!(matching_commands("s").len(), 1);
        assert_eq!(matching_commands("st")[0].name, "stock");

        assert_eq!(matching_commands("t").len(), 1);
        assert_eq!(matching_commands("tr")[0].name, "trace");

        assert_eq!(matching_commands("p").len(), 1);
        assert_eq!(matching_commands("pg")[0].name, "page");

        assert_eq!(matching_commands("q")[0].name, "quit");
        assert!(matching_commands("xyz").is_empty());
    }

    #[test]
    fn test_resolve_command() {
        assert_eq!(resolve_command("i").map(|c| c.name), Some("item"));
        assert_eq!(resolve_command("PAGE").map(|c| c.name), Some("page"));
        assert!(resolve_command("ite").is_none());
    }
}
