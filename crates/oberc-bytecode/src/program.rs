//! Program components for the instruction listing.

use std::fmt;

use crate::instruction::Instruction;

/// One compiled function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Entry label, mangled or plain depending on the code generator options.
    pub label: String,
    /// Estimated frame size; informational only.
    pub frame_bytes: usize,
    pub code: Vec<Instruction>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        writeln!(f, "; frame {} bytes", self.frame_bytes)?;
        for instr in &self.code {
            writeln!(f, "{}", instr)?;
        }
        Ok(())
    }
}

/// Renders the listing: functions in order, separated by a blank line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listing_layout() {
        let program = Program {
            functions: vec![
                Function {
                    label: "one$".into(),
                    frame_bytes: 0,
                    code: vec![Instruction::PushInteger(1), Instruction::Return, Instruction::Return],
                },
                Function { label: "two$b".into(), frame_bytes: 8, code: vec![Instruction::Return] },
            ],
        };
        let expected = "\
one$:
; frame 0 bytes
push_integer 1
return
return

two$b:
; frame 8 bytes
return
";
        assert_eq!(program.to_string(), expected);
    }
}
