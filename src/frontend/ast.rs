use std::fmt;

/// Name given to the prototype wrapped around a bare top-level expression.
pub const ANON_EXPR_NAME: &str = "__anon_expr";

// The set of expression kinds is fixed, so an enum rather than
// a trait object per node.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTExpr {
    NumberExpr(f64),
    VariableExpr(String),
    BinaryExpr {
        op: char,
        left: Box<ASTExpr>,
        right: Box<ASTExpr>,
    },
    CallExpr {
        callee: String,
        args: Vec<ASTExpr>,
    },
}

impl ASTExpr {
    pub fn binary(op: char, left: ASTExpr, right: ASTExpr) -> Self {
        ASTExpr::BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// Prototype
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub args: Vec<String>,
}

impl Prototype {
    pub fn anonymous() -> Self {
        Self {
            name: ANON_EXPR_NAME.to_string(),
            args: vec![],
        }
    }
}

// Function
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub proto: Box<Prototype>,
    pub body: Box<ASTExpr>,
}

impl Function {
    pub fn is_anonymous(&self) -> bool {
        self.proto.name == ANON_EXPR_NAME
    }
}

// Compact dump for --inspect-tree, every binary expression gets its
// own parenthesis so the grouping the parser chose is visible.
impl fmt::Display for ASTExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTExpr::NumberExpr(num) => write!(f, "{num}"),
            ASTExpr::VariableExpr(name) => write!(f, "{name}"),
            ASTExpr::BinaryExpr { op, left, right } => write!(f, "({left} {op} {right})"),
            ASTExpr::CallExpr { callee, args } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(" "))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {} {}", self.proto, self.body)
    }
}
