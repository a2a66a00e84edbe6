/// What kind of thing a unit is. The spoken word follows its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Label,
    Button,
    TextField,
    Checkbox,
    Toggle,
    Grid,
    Menu,
    Submenu,
    MenuBar,
    Screen,
    Dialog,
    Window,
}

impl Role {
    pub fn word(self) -> &'static str {
        match self {
            Role::Label => "",
            Role::Button => "button",
            Role::TextField => "edit",
            Role::Checkbox => "check box",
            Role::Toggle => "toggle button",
            Role::Grid => "grid",
            Role::Menu => "menu",
            Role::Submenu => "submenu",
            Role::MenuBar => "menu bar",
            Role::Screen => "screen",
            Role::Dialog => "dialog",
            Role::Window => "window",
        }
    }
}

/// `"{label} {role}"`, dropping whichever half is empty.
pub fn spoken_name(label: &str, role: Role) -> String {
    match (label.is_empty(), role.word()) {
        (true, word) => word.to_owned(),
        (false, "") => label.to_owned(),
        (false, word) => format!("{label} {word}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_name() {
        assert_eq!(spoken_name("Start", Role::Button), "Start button");
        assert_eq!(spoken_name("Welcome", Role::Label), "Welcome");
        assert_eq!(spoken_name("", Role::MenuBar), "menu bar");
        assert_eq!(spoken_name("Name", Role::TextField), "Name edit");
    }
}
