// cvar.rs — console variables, the configuration layer of the input core
//
// Options the input core reads:
//   pause_on_focus_loss  pause the game while the window is unfocused
//   hardware_cursor      use the platform cursor instead of a drawn one
//   joy_deadzone         radial dead zone for analog sticks (0..1)
//   developer            enable com_dprintf output

use std::collections::HashMap;
use std::io::Write;

use parking_lot::Mutex;

use crate::common::{com_printf, com_set_developer};

pub const CVAR_ARCHIVE: i32 = 1; // saved by write_variables
pub const CVAR_NOSET: i32 = 8; // only settable from the command line / force_set

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub default_string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
}

/// The full cvar system context.
#[derive(Default)]
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    /// O(1) cvar lookup by name -> index in cvar_vars
    cvar_index: HashMap<String, usize>,
    /// `developer` here gates com_dprintf
    drives_logging: bool,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pre-populated with every option the input core reads.
    pub fn with_input_defaults() -> Self {
        let mut ctx = Self::new();
        ctx.register_input_defaults();
        ctx
    }

    pub fn register_input_defaults(&mut self) {
        self.get("pause_on_focus_loss", "1", CVAR_ARCHIVE);
        self.get("hardware_cursor", "1", CVAR_ARCHIVE);
        self.get("joy_deadzone", "0.07", CVAR_ARCHIVE);
        self.get("developer", "0", 0);
    }

    /// Make this context the one whose `developer` value gates com_dprintf.
    pub fn drive_logging(&mut self) {
        self.drives_logging = true;
        com_set_developer(self.is_enabled("developer"));
    }

    fn sync_logging(&self, name: &str, value: f32) {
        if self.drives_logging && name == "developer" {
            com_set_developer(value != 0.0);
        }
    }

    /// Find a cvar by name, returning its index. O(1) via HashMap.
    pub fn find_var_index(&self, name: &str) -> Option<usize> {
        self.cvar_index.get(name).copied()
    }

    /// Find a cvar by name. O(1) via HashMap.
    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Get the floating-point value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        match self.find_var(name) {
            Some(var) => var.value,
            None => 0.0,
        }
    }

    /// Get the string value of a cvar. Returns "" if not found.
    pub fn variable_string(&self, name: &str) -> &str {
        match self.find_var(name) {
            Some(var) => &var.string,
            None => "",
        }
    }

    /// Convenience for the on/off options.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.variable_value(name) != 0.0
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> usize {
        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return idx;
        }

        let idx = self.cvar_vars.len();
        self.sync_logging(name, parse_value(value));
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            default_string: value.to_string(),
            flags,
            modified: true,
            value: parse_value(value),
        });
        self.cvar_index.insert(name.to_string(), idx);
        idx
    }

    fn set2(&mut self, name: &str, value: &str, force: bool) -> usize {
        let idx = match self.find_var_index(name) {
            Some(idx) => idx,
            None => return self.get(name, value, 0),
        };

        let var = &mut self.cvar_vars[idx];
        if !force && var.flags & CVAR_NOSET != 0 {
            com_printf(&format!("{} is write protected.\n", name));
            return idx;
        }

        if value == var.string {
            return idx;
        }

        var.modified = true;
        var.string = value.to_string();
        var.value = parse_value(value);
        let parsed = var.value;
        self.sync_logging(name, parsed);
        idx
    }

    pub fn set(&mut self, name: &str, value: &str) -> usize {
        self.set2(name, value, false)
    }

    pub fn force_set(&mut self, name: &str, value: &str) -> usize {
        self.set2(name, value, true)
    }

    pub fn set_value(&mut self, name: &str, value: f32) {
        let s = if value == (value as i32) as f32 {
            format!("{}", value as i32)
        } else {
            format!("{}", value)
        };
        self.set(name, &s);
    }

    /// Reset a variable to the value it was registered with.
    pub fn reset(&mut self, name: &str) {
        if let Some(def) = self.find_var(name).map(|v| v.default_string.clone()) {
            self.force_set(name, &def);
        }
    }

    /// Write `set name "value"` lines for every archived variable.
    pub fn write_variables(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        for var in &self.cvar_vars {
            if var.flags & CVAR_ARCHIVE != 0 {
                writeln!(writer, "set {} \"{}\"", var.name, var.string)?;
            }
        }
        Ok(())
    }

    /// Execute config text made of `set name value` lines. Unknown commands
    /// and malformed lines are reported and skipped. Returns the number of
    /// variables set.
    pub fn exec_config(&mut self, text: &str) -> usize {
        let mut applied = 0;
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.split("//").next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let args = tokenize(line);
            match args.as_slice() {
                [cmd, name, value] if cmd == "set" => {
                    self.set(name, value);
                    applied += 1;
                }
                [cmd, ..] if cmd == "set" => {
                    com_printf(&format!("line {}: usage: set <variable> <value>\n", lineno + 1));
                }
                [cmd, ..] => {
                    com_printf(&format!("line {}: unknown command \"{}\"\n", lineno + 1, cmd));
                }
                [] => {}
            }
        }
        applied
    }

    /// Print every variable matching an optional prefix.
    pub fn list(&self, prefix: Option<&str>) -> usize {
        let mut matching = 0;
        for var in &self.cvar_vars {
            if let Some(p) = prefix {
                if !var.name.starts_with(p) {
                    continue;
                }
            }
            matching += 1;
            let archive = if var.flags & CVAR_ARCHIVE != 0 { '*' } else { ' ' };
            let noset = if var.flags & CVAR_NOSET != 0 { '-' } else { ' ' };
            com_printf(&format!("{}{} {} \"{}\"\n", archive, noset, var.name, var.string));
        }
        com_printf(&format!("{} cvars, {} matching\n", self.cvar_vars.len(), matching));
        matching
    }
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

/// Split a config line into whitespace separated tokens; double quotes group.
fn tokenize(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&c) = chars.peek() else { break };
        let mut token = String::new();
        if c == '"' {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        args.push(token);
    }
    args
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = Mutex::new(None);

/// Create the global context. It drives com_dprintf.
pub fn cvar_init() {
    let mut ctx = CvarContext::with_input_defaults();
    ctx.drive_logging();
    *CVAR_CTX.lock() = Some(ctx);
}

pub fn cvar_shutdown() {
    *CVAR_CTX.lock() = None;
    com_set_developer(false);
}

pub fn cvar_set(name: &str, value: &str) {
    if let Some(ref mut c) = *CVAR_CTX.lock() {
        c.set(name, value);
    }
}

pub fn cvar_variable_value(name: &str) -> f32 {
    CVAR_CTX.lock().as_ref().map_or(0.0, |c| c.variable_value(name))
}

pub fn cvar_variable_string(name: &str) -> String {
    CVAR_CTX.lock().as_ref().map_or(String::new(), |c| c.variable_string(name).to_string())
}

/// Access the global context with a closure. Returns None if not initialized.
/// The lock is held for the whole call; com_dprintf does not take it.
pub fn with_cvar_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CvarContext) -> R,
{
    CVAR_CTX.lock().as_mut().map(f)
}

// ============================================================
// Tests
// ============================================================
