use std::fmt;

use crate::compile::{
    ast::{Assertion, Ast, LookKind},
    CharClass, Config, Error, ErrorKind,
};

/// A single instruction of a compiled program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Inst {
    /// Match one character.
    Char(char),
    /// Match one character of the class.
    Class(CharClass),
    /// Match any character.
    Any,
    /// Match any character except `\n`.
    AnyNotNl,
    /// Check a zero-width assertion.
    Assert(Assertion),
    /// Record the current position in a slot.
    Save(usize),
    /// Fail unless the position moved since the slot was saved.
    Progress(usize),
    /// Try the first branch, then the second one.
    Split(usize, usize),
    Jmp(usize),
    /// Resolve the body starting at the next instruction, then continue at `next`.
    Look { kind: LookKind, next: usize },
    /// End of a look body.
    Succeed,
    Match,
}

/// An executable program with the layout `Save(0) body Save(1) Match`.
///
/// The slots past the capture slots hold the start of the current iteration of each loop whose body can match
/// the empty string.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Program {
    insts: Vec<Inst>,
    capture_slots: usize,
    num_slots: usize,
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program(captures={}, slots={})", self.capture_slots, self.num_slots)?;

        for (pc, inst) in self.insts.iter().enumerate() {
            writeln!(f, "{:04} {:?}", pc, inst)?;
        }

        Ok(())
    }
}

impl Program {
    /// Generate the program for the syntax tree of a pattern with `num_groups` groups.
    pub fn compile(ast: &Ast, num_groups: usize, config: &Config) -> Result<Program, Error> {
        let mut compiler = Compiler {
            insts: vec![],
            size_limit: config.get_size_limit(),
            next_slot: num_groups * 2,
        };

        compiler.emit(Inst::Save(0))?;
        compiler.compile(ast)?;
        compiler.emit(Inst::Save(1))?;
        compiler.emit(Inst::Match)?;

        Ok(Program {
            insts: compiler.insts,
            capture_slots: num_groups * 2,
            num_slots: compiler.next_slot,
        })
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn capture_slots(&self) -> usize {
        self.capture_slots
    }
}

struct Compiler {
    insts: Vec<Inst>,
    size_limit: usize,
    next_slot: usize,
}

impl Compiler {
    fn pc(&self) -> usize {
        self.insts.len()
    }

    fn emit(&mut self, inst: Inst) -> Result<usize, Error> {
        if self.insts.len() >= self.size_limit {
            return Err(Error::without_offset(ErrorKind::TooBig(self.size_limit)));
        }

        self.insts.push(inst);

        Ok(self.insts.len() - 1)
    }

    fn patch(&mut self, pc: usize, inst: Inst) {
        self.insts[pc] = inst;
    }

    fn compile(&mut self, ast: &Ast) -> Result<(), Error> {
        match ast {
            Ast::Empty => {}
            Ast::Literal(c) => {
                self.emit(Inst::Char(*c))?;
            }
            Ast::Class(class) => {
                self.emit(Inst::Class(class.clone()))?;
            }
            Ast::Dot { dotall: true } => {
                self.emit(Inst::Any)?;
            }
            Ast::Dot { dotall: false } => {
                self.emit(Inst::AnyNotNl)?;
            }
            Ast::Assert(assertion) => {
                self.emit(Inst::Assert(*assertion))?;
            }
            Ast::Capture { index, ast } => {
                self.emit(Inst::Save(index * 2))?;
                self.compile(ast)?;
                self.emit(Inst::Save(index * 2 + 1))?;
            }
            Ast::Look { kind, ast } => {
                let look = self.emit(Inst::Look { kind: *kind, next: 0 })?;
                self.compile(ast)?;
                self.emit(Inst::Succeed)?;

                let next = self.pc();
                self.patch(look, Inst::Look { kind: *kind, next });
            }
            Ast::Concat(asts) => {
                for ast in asts {
                    self.compile(ast)?;
                }
            }
            Ast::Alternate(asts) => self.compile_alternate(asts)?,
            Ast::Repeat { ast, min, max, greedy } => self.compile_repeat(ast, *min, *max, *greedy)?,
        }

        Ok(())
    }

    fn compile_alternate(&mut self, asts: &[Ast]) -> Result<(), Error> {
        let mut jumps = vec![];

        if let Some((last, init)) = asts.split_last() {
            for ast in init {
                let split = self.emit(Inst::Split(0, 0))?;
                self.compile(ast)?;
                jumps.push(self.emit(Inst::Jmp(0))?);

                let next = self.pc();
                self.patch(split, Inst::Split(split + 1, next));
            }

            self.compile(last)?;
        }

        let end = self.pc();

        for jump in jumps {
            self.patch(jump, Inst::Jmp(end));
        }

        Ok(())
    }

    fn split(&self, greedy: bool, body: usize, exit: usize) -> Inst {
        if greedy {
            Inst::Split(body, exit)
        } else {
            Inst::Split(exit, body)
        }
    }

    /// Allocate a slot for the empty iteration guard of a loop, if its body can match the empty string.
    fn guard(&mut self, ast: &Ast) -> Option<usize> {
        if ast.min_width() > 0 {
            return None;
        }

        let slot = self.next_slot;
        self.next_slot += 1;

        Some(slot)
    }

    fn compile_repeat(&mut self, ast: &Ast, min: u32, max: Option<u32>, greedy: bool) -> Result<(), Error> {
        match max {
            None if min == 0 => {
                // L: split(L+1, end); [save g]; body; [progress g]; jmp L; end:
                let guard = self.guard(ast);
                let split = self.emit(Inst::Split(0, 0))?;

                if let Some(slot) = guard {
                    self.emit(Inst::Save(slot))?;
                }
                self.compile(ast)?;
                if let Some(slot) = guard {
                    self.emit(Inst::Progress(slot))?;
                }
                self.emit(Inst::Jmp(split))?;

                let end = self.pc();
                let inst = self.split(greedy, split + 1, end);
                self.patch(split, inst);
            }
            None => {
                for _ in 1..min {
                    self.compile(ast)?;
                }

                let guard = self.guard(ast);

                // L: [save g]; body; split(C, next); C: [progress g; jmp L]
                let body = self.pc();

                if let Some(slot) = guard {
                    self.emit(Inst::Save(slot))?;
                }
                self.compile(ast)?;

                let split = self.emit(Inst::Split(0, 0))?;
                let again = match guard {
                    Some(slot) => {
                        let again = self.emit(Inst::Progress(slot))?;
                        self.emit(Inst::Jmp(body))?;
                        again
                    }
                    None => body,
                };

                let inst = self.split(greedy, again, self.pc());
                self.patch(split, inst);
            }
            Some(max) => {
                for _ in 0..min {
                    self.compile(ast)?;
                }

                let mut splits = vec![];

                for _ in min..max {
                    splits.push(self.emit(Inst::Split(0, 0))?);
                    self.compile(ast)?;
                }

                let end = self.pc();

                for split in splits {
                    let inst = self.split(greedy, split + 1, end);
                    self.patch(split, inst);
                }
            }
        }

        Ok(())
    }
}
