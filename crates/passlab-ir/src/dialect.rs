//! Dialect definitions.
//!
//! A dialect is a named, static table of operation definitions. Dialects are
//! loaded into a [`crate::Context`] before parsing; the parser and the passes
//! consult the context to learn what an operation name means.

use std::fmt;

use crate::types::Type;

/// Name of the module wrapper operation printed around every module.
pub const MODULE_OP: &str = "builtin.module";
/// Name of the function operation.
pub const FUNC_OP: &str = "func.func";
/// Name of the function terminator.
pub const RETURN_OP: &str = "func.return";
/// Name of the integer constant operation.
pub const CONSTANT_OP: &str = "arith.constant";

/// Attribute key holding the value of `arith.constant`.
pub const VALUE_ATTR: &str = "value";

/// Integer binary operators of the `arith` dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    DivS,
    RemS,
    And,
    Or,
    Xor,
    Shl,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 9] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::DivS,
        Self::RemS,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Shl,
    ];

    /// Fully qualified operation name.
    pub fn op_name(self) -> &'static str {
        match self {
            Self::Add => "arith.addi",
            Self::Sub => "arith.subi",
            Self::Mul => "arith.muli",
            Self::DivS => "arith.divsi",
            Self::RemS => "arith.remsi",
            Self::And => "arith.andi",
            Self::Or => "arith.ori",
            Self::Xor => "arith.xori",
            Self::Shl => "arith.shli",
        }
    }

    pub fn from_op_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.op_name() == name)
    }

    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Mul | Self::And | Self::Or | Self::Xor
        )
    }

    /// Evaluates the operator on two constants of type `ty`.
    ///
    /// Returns `None` when the result is undefined: division by zero, signed
    /// overflow in division, or a shift amount outside `0..width`.
    pub fn fold(self, lhs: i64, rhs: i64, ty: Type) -> Option<i64> {
        let lhs = ty.wrap(lhs);
        let rhs = ty.wrap(rhs);
        let result = match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::DivS => {
                let quotient = lhs.checked_div(rhs)?;
                if !ty.fits(quotient) {
                    return None;
                }
                quotient
            }
            Self::RemS => lhs.checked_rem(rhs)?,
            Self::And => lhs & rhs,
            Self::Or => lhs | rhs,
            Self::Xor => lhs ^ rhs,
            Self::Shl => {
                if rhs < 0 || rhs >= i64::from(ty.width()) {
                    return None;
                }
                ((lhs as u64) << rhs) as i64
            }
        };
        Some(ty.wrap(result))
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op_name())
    }
}

/// Syntactic and semantic category of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// `func.func`; only valid at module level.
    Function,
    /// Function terminator; operands are the returned values.
    Return,
    /// Integer constant carrying a `value` attribute.
    Constant,
    /// Two operands, one result of the same type.
    Binary(BinaryOp),
}

/// Static description of one operation of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDef {
    pub name: &'static str,
    pub kind: OpKind,
    /// Pure operations have no side effects and may be erased when unused.
    pub pure: bool,
}

/// A named table of operation definitions.
#[derive(Debug, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    pub ops: &'static [OpDef],
}

impl Dialect {
    pub fn op(&self, name: &str) -> Option<&'static OpDef> {
        self.ops.iter().find(|def| def.name == name)
    }
}

const fn binary(op: BinaryOp, name: &'static str) -> OpDef {
    OpDef {
        name,
        kind: OpKind::Binary(op),
        pure: true,
    }
}

/// The `func` dialect: functions and their terminator.
pub static FUNC: Dialect = Dialect {
    name: "func",
    ops: &[
        OpDef {
            name: FUNC_OP,
            kind: OpKind::Function,
            pure: false,
        },
        OpDef {
            name: RETURN_OP,
            kind: OpKind::Return,
            pure: false,
        },
    ],
};

/// The `arith` dialect: integer constants and arithmetic.
pub static ARITH: Dialect = Dialect {
    name: "arith",
    ops: &[
        OpDef {
            name: CONSTANT_OP,
            kind: OpKind::Constant,
            pure: true,
        },
        binary(BinaryOp::Add, "arith.addi"),
        binary(BinaryOp::Sub, "arith.subi"),
        binary(BinaryOp::Mul, "arith.muli"),
        binary(BinaryOp::DivS, "arith.divsi"),
        binary(BinaryOp::RemS, "arith.remsi"),
        binary(BinaryOp::And, "arith.andi"),
        binary(BinaryOp::Or, "arith.ori"),
        binary(BinaryOp::Xor, "arith.xori"),
        binary(BinaryOp::Shl, "arith.shli"),
    ],
};

static ALL_DIALECTS: [&Dialect; 2] = [&ARITH, &FUNC];

/// Every dialect known to this crate.
pub fn all_dialects() -> &'static [&'static Dialect] {
    &ALL_DIALECTS
}

/// Splits `dialect.op` into its dialect prefix.
pub fn dialect_prefix(op_name: &str) -> Option<&str> {
    op_name.split_once('.').map(|(prefix, _)| prefix)
}
