//! Closed name tables consulted by the scanner.
//!
//! Every table is a fieldless enum generated by [`name_table!`], which gives
//! each variant its source spelling plus a `lookup` for the reverse direction.

/// Declares a closed table of names with their source spellings.
macro_rules! name_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $table:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $table {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $table {
            /// Every entry, in declaration order
            pub const ALL: &'static [$table] = &[$($table::$variant,)+];

            /// Source spelling of this entry
            pub fn as_str(self) -> &'static str {
                match self {
                    $($table::$variant => $text,)+
                }
            }

            /// Finds the entry spelled exactly `text`
            pub fn lookup(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($table::$variant),)+
                    _ => None,
                }
            }

            /// Membership test for this table
            pub fn contains(text: &str) -> bool {
                Self::lookup(text).is_some()
            }
        }

        impl std::fmt::Display for $table {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use name_table;

name_table! {
    /// Reserved words of the language
    pub enum Keyword {
        Abstract => "abstract",
        As => "as",
        Async => "async",
        Await => "await",
        Break => "break",
        Catch => "catch",
        Class => "class",
        /// Variable sigil; never produced by identifier scanning
        DeclVar => "@",
        Delete => "delete",
        Do => "do",
        Else => "else",
        ElseIf => "elseif",
        End => "end",
        Exit => "exit",
        Export => "export",
        False => "false",
        For => "for",
        If => "if",
        Import => "import",
        In => "in",
        Lambda => "with",
        Method => "method",
        Module => "module",
        Next => "next",
        Override => "override",
        Parse => "parse",
        Pass => "pass",
        Print => "print",
        PrintLn => "println",
        Private => "private",
        Return => "return",
        Static => "static",
        Then => "then",
        This => "this",
        Throw => "throw",
        True => "true",
        Try => "try",
        While => "while",
    }
}

impl Keyword {
    /// `if`, `elseif`, `else` and `end` delimit conditional constructs
    pub fn is_conditional(self) -> bool {
        matches!(
            self,
            Keyword::If | Keyword::ElseIf | Keyword::Else | Keyword::End
        )
    }

    /// `true` and `false` scan as boolean literals
    pub fn is_boolean(self) -> bool {
        matches!(self, Keyword::True | Keyword::False)
    }
}

name_table! {
    /// Built-in type names
    pub enum TypeName {
        Boolean => "Boolean",
        Double => "Double",
        Hash => "Hash",
        Integer => "Integer",
        Lambda => "Lambda",
        List => "List",
        None => "None",
        Object => "Object",
        String => "String",
    }
}

name_table! {
    /// Operator spellings, including compound assignments
    pub enum Operator {
        Add => "+",
        AddAssign => "+=",
        And => "&&",
        AndAssign => "&&=",
        Assign => "=",
        BitwiseAnd => "&",
        BitwiseAndAssign => "&=",
        BitwiseLeftShift => "<<",
        BitwiseLeftShiftAssign => "<<=",
        BitwiseNot => "~",
        BitwiseNotAssign => "~=",
        BitwiseOr => "|",
        BitwiseOrAssign => "|=",
        BitwiseRightShift => ">>",
        BitwiseRightShiftAssign => ">>=",
        BitwiseXor => "^",
        BitwiseXorAssign => "^=",
        Divide => "/",
        DivideAssign => "/=",
        Equal => "==",
        Exponent => "**",
        ExponentAssign => "**=",
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
        LessThan => "<",
        LessThanOrEqual => "<=",
        ModuloAssign => "%=",
        Modulus => "%",
        Multiply => "*",
        MultiplyAssign => "*=",
        Not => "!",
        NotEqual => "!=",
        Or => "||",
        OrAssign => "||=",
        Subtract => "-",
        SubtractAssign => "-=",
    }
}

/// Spelled-out forms of the logical operators
pub fn word_operator(text: &str) -> Option<Operator> {
    match text {
        "and" => Some(Operator::And),
        "or" => Some(Operator::Or),
        "not" => Some(Operator::Not),
        _ => None,
    }
}

impl Operator {
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Subtract
                | Operator::Multiply
                | Operator::Divide
                | Operator::Exponent
                | Operator::Modulus
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
        )
    }

    /// Operators accepted after `@name` in an assignment statement
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::AddAssign
                | Operator::SubtractAssign
                | Operator::MultiplyAssign
                | Operator::DivideAssign
                | Operator::ExponentAssign
                | Operator::ModuloAssign
        )
    }

    /// The arithmetic operator a compound assignment applies
    pub fn compound_base(self) -> Option<Operator> {
        match self {
            Operator::AddAssign => Some(Operator::Add),
            Operator::SubtractAssign => Some(Operator::Subtract),
            Operator::MultiplyAssign => Some(Operator::Multiply),
            Operator::DivideAssign => Some(Operator::Divide),
            Operator::ExponentAssign => Some(Operator::Exponent),
            Operator::ModuloAssign => Some(Operator::Modulus),
            _ => None,
        }
    }
}

pub fn is_arithmetic_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%')
}

pub fn is_boolean_operator_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>' | '&' | '|')
}

pub fn is_bitwise_operator_char(c: char) -> bool {
    matches!(c, '&' | '|' | '^' | '~')
}

/// Two-character operators that take a trailing `=` to form a compound assignment
pub fn is_large_operator(op: &str) -> bool {
    matches!(op, "**" | "<<" | ">>" | "&&" | "||")
}
