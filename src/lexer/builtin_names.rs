//! Builtin name tables.
//!
//! The scanner only needs to *recognize* builtin names; what a builtin does is
//! up to the handler registered for its domain (see [`crate::builtins`]).
//! Domain tables are consulted in the fixed order of [`BuiltinDomain::PRECEDENCE`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::names::name_table;

name_table! {
    pub enum ArgvBuiltin {
        GetArgv => "__argv__",
        GetXarg => "__xarg__",
    }
}

name_table! {
    pub enum ConsoleBuiltin {
        Input => "__input__",
        Silent => "__silent__",
    }
}

name_table! {
    pub enum EnvBuiltin {
        GetEnvironmentVariable => "__getenv__",
        SetEnvironmentVariable => "__setenv__",
    }
}

name_table! {
    pub enum FileIoBuiltin {
        AppendText => "__appendtext__",
        ChangeDirectory => "__chdir__",
        Combine => "__combine__",
        CopyFile => "__copyfile__",
        CopyR => "__copyr__",
        CreateFile => "__createfile__",
        DeleteFile => "__deletefile__",
        FileExists => "__fileexists__",
        FileName => "__filename__",
        FileSize => "__filesize__",
        GetCurrentDirectory => "__cwd__",
        GetFileAbsolutePath => "__fileabspath__",
        GetFileAttributes => "__fileattrs__",
        GetFileExtension => "__fileext__",
        GetFilePath => "__filepath__",
        Glob => "__glob__",
        IsDirectory => "__isdir__",
        ListDirectory => "__listdir__",
        MakeDirectory => "__mkdir__",
        MakeDirectoryP => "__mkdirp__",
        MoveFile => "__movefile__",
        ReadBytes => "__readbytes__",
        ReadFile => "__readfile__",
        ReadLines => "__readlines__",
        RemoveDirectory => "__rmdir__",
        RemoveDirectoryF => "__rmdirf__",
        TempDir => "__tmpdir__",
        WriteBytes => "__writebytes__",
        WriteLine => "__writeline__",
        WriteText => "__writetext__",
    }
}

name_table! {
    pub enum LoggingBuiltin {
        Debug => "__log_debug__",
        EntryFormat => "__log_entryformat__",
        Error => "__log_error__",
        FilePath => "__log_filepath__",
        Info => "__log_info__",
        Level => "__log_level__",
        Mode => "__log_mode__",
        TimestampFormat => "__log_timestampformat__",
        Warn => "__log_warn__",
    }
}

name_table! {
    pub enum ListBuiltin {
        Map => "map",
        Max => "max",
        Min => "min",
        None => "none",
        Reduce => "reduce",
        Select => "select",
        Sort => "sort",
        Sum => "sum",
        ToH => "to_h",
    }
}

name_table! {
    pub enum MathBuiltin {
        Abs => "__abs__",
        Acos => "__acos__",
        Asin => "__asin__",
        Atan => "__atan__",
        Atan2 => "__atan2__",
        Cbrt => "__cbrt__",
        Ceil => "__ceil__",
        CopySign => "__copysign__",
        Cos => "__cos__",
        Cosh => "__cosh__",
        Divisors => "__divisors__",
        Epsilon => "__epsilon__",
        Erf => "__erf__",
        ErfC => "__erfc__",
        Exp => "__exp__",
        ExpM1 => "__expm1__",
        FDim => "__fdim__",
        FMax => "__fmax__",
        FMin => "__fmin__",
        Floor => "__floor__",
        Fmod => "__fmod__",
        Hypot => "__hypot__",
        IsFinite => "__isfinite__",
        IsInf => "__isinf__",
        IsNaN => "__isnan__",
        IsNormal => "__isnormal__",
        LGamma => "__lgamma__",
        ListPrimes => "__listprimes__",
        Log => "__log__",
        Log10 => "__log10__",
        Log1P => "__log1p__",
        Log2 => "__log2__",
        NextAfter => "__nextafter__",
        NthPrime => "__nthprime__",
        Pow => "__pow__",
        Random => "__random__",
        Remainder => "__remainder__",
        RotateLeft => "__rotl__",
        RotateRight => "__rotr__",
        Round => "__round__",
        Sin => "__sin__",
        Sinh => "__sinh__",
        Sqrt => "__sqrt__",
        TGamma => "__tgamma__",
        Tan => "__tan__",
        Tanh => "__tanh__",
        Trunc => "__trunc__",
    }
}

name_table! {
    pub enum ModuleBuiltin {
        Home => "__home__",
    }
}

name_table! {
    pub enum SysBuiltin {
        EffectiveUserId => "__euid__",
        Exec => "__exec__",
        ExecOut => "__execout__",
    }
}

name_table! {
    pub enum TimeBuiltin {
        AmPm => "__ampm__",
        Delay => "__delay__",
        EpochMilliseconds => "__epochms__",
        FormatDateTime => "__dtformat__",
        Hour => "__hour__",
        IsDst => "__isdst__",
        Minute => "__minute__",
        Month => "__month__",
        MonthDay => "__monthday__",
        Second => "__second__",
        Ticks => "__ticks__",
        TicksToMilliseconds => "__ticksms__",
        Timestamp => "__timestamp__",
        WeekDay => "__weekday__",
        Year => "__year__",
        YearDay => "__yearday__",
    }
}

name_table! {
    pub enum WebServerBuiltin {
        Get => "__server_get__",
        Host => "__server_host__",
        Listen => "__server_listen__",
        Port => "__server_port__",
        Post => "__server_post__",
        Public => "__server_public__",
    }
}

name_table! {
    pub enum WebClientBuiltin {
        Delete => "__http_delete__",
        Get => "__http_get__",
        Head => "__http_head__",
        Options => "__http_options__",
        Patch => "__http_patch__",
        Post => "__http_post__",
        Put => "__http_put__",
    }
}

name_table! {
    pub enum EncoderBuiltin {
        Base64Decode => "__base64decode__",
        Base64Encode => "__base64encode__",
        UrlDecode => "__urldecode__",
        UrlEncode => "__urlencode__",
    }
}

name_table! {
    pub enum SerializerBuiltin {
        Deserialize => "__deserialize__",
        Serialize => "__serialize__",
    }
}

name_table! {
    /// Methods recognized only when called on a receiver (`value.name`)
    pub enum CoreBuiltin {
        BeginsWith => "begins_with",
        Chars => "chars",
        Clear => "clear",
        Clone => "clone",
        Concat => "concat",
        Contains => "contains",
        Count => "count",
        Dequeue => "dequeue",
        Downcase => "downcase",
        Empty => "empty",
        EndsWith => "ends_with",
        Enqueue => "enqueue",
        Find => "find",
        Flatten => "flatten",
        HasKey => "has_key",
        IndexOf => "index_of",
        Insert => "insert",
        IsA => "is_a",
        Join => "join",
        Keys => "keys",
        LastIndexOf => "last_index_of",
        LeftTrim => "lstrip",
        Match => "match",
        Matches => "matches",
        MatchesAll => "matches_all",
        Members => "members",
        Merge => "merge",
        Pop => "pop",
        Pretty => "pretty",
        Push => "push",
        Remove => "remove",
        RemoveAt => "remove_at",
        Replace => "replace",
        Reverse => "reverse",
        RightTrim => "rstrip",
        Rotate => "rotate",
        Scan => "scan",
        Shift => "shift",
        Size => "size",
        Slice => "slice",
        Split => "split",
        Substring => "substring",
        ToBytes => "to_bytes",
        ToD => "to_d",
        ToHex => "to_hex",
        ToI => "to_i",
        ToS => "to_s",
        Trim => "strip",
        Type => "type",
        Unique => "unique",
        Unshift => "unshift",
        Upcase => "upcase",
        Values => "values",
        Zip => "zip",
    }
}

/// A builtin domain; each one is served by one external handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinDomain {
    Argv,
    Console,
    Env,
    FileIo,
    Logging,
    List,
    Math,
    Module,
    Sys,
    Time,
    WebServer,
    WebClient,
    Encoder,
    Serializer,
    Core,
}

impl BuiltinDomain {
    /// Order in which the global (name-only) tables are consulted.
    /// `Core` is absent: it is only consulted for called builtins.
    pub const PRECEDENCE: [BuiltinDomain; 14] = [
        BuiltinDomain::Argv,
        BuiltinDomain::Console,
        BuiltinDomain::Env,
        BuiltinDomain::FileIo,
        BuiltinDomain::Logging,
        BuiltinDomain::List,
        BuiltinDomain::Math,
        BuiltinDomain::Module,
        BuiltinDomain::Sys,
        BuiltinDomain::Time,
        BuiltinDomain::WebServer,
        BuiltinDomain::WebClient,
        BuiltinDomain::Encoder,
        BuiltinDomain::Serializer,
    ];

    /// Classifies `text` against this domain's table only
    pub fn classify(self, text: &str) -> Option<Builtin> {
        match self {
            BuiltinDomain::Argv => ArgvBuiltin::lookup(text).map(Builtin::Argv),
            BuiltinDomain::Console => ConsoleBuiltin::lookup(text).map(Builtin::Console),
            BuiltinDomain::Env => EnvBuiltin::lookup(text).map(Builtin::Env),
            BuiltinDomain::FileIo => FileIoBuiltin::lookup(text).map(Builtin::FileIo),
            BuiltinDomain::Logging => LoggingBuiltin::lookup(text).map(Builtin::Logging),
            BuiltinDomain::List => ListBuiltin::lookup(text).map(Builtin::List),
            BuiltinDomain::Math => MathBuiltin::lookup(text).map(Builtin::Math),
            BuiltinDomain::Module => ModuleBuiltin::lookup(text).map(Builtin::Module),
            BuiltinDomain::Sys => SysBuiltin::lookup(text).map(Builtin::Sys),
            BuiltinDomain::Time => TimeBuiltin::lookup(text).map(Builtin::Time),
            BuiltinDomain::WebServer => WebServerBuiltin::lookup(text).map(Builtin::WebServer),
            BuiltinDomain::WebClient => WebClientBuiltin::lookup(text).map(Builtin::WebClient),
            BuiltinDomain::Encoder => EncoderBuiltin::lookup(text).map(Builtin::Encoder),
            BuiltinDomain::Serializer => {
                SerializerBuiltin::lookup(text).map(Builtin::Serializer)
            }
            BuiltinDomain::Core => CoreBuiltin::lookup(text).map(Builtin::Core),
        }
    }
}

/// A recognized builtin name, tagged with its domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Argv(ArgvBuiltin),
    Console(ConsoleBuiltin),
    Env(EnvBuiltin),
    FileIo(FileIoBuiltin),
    Logging(LoggingBuiltin),
    List(ListBuiltin),
    Math(MathBuiltin),
    Module(ModuleBuiltin),
    Sys(SysBuiltin),
    Time(TimeBuiltin),
    WebServer(WebServerBuiltin),
    WebClient(WebClientBuiltin),
    Encoder(EncoderBuiltin),
    Serializer(SerializerBuiltin),
    Core(CoreBuiltin),
}

impl Builtin {
    pub fn domain(self) -> BuiltinDomain {
        match self {
            Builtin::Argv(_) => BuiltinDomain::Argv,
            Builtin::Console(_) => BuiltinDomain::Console,
            Builtin::Env(_) => BuiltinDomain::Env,
            Builtin::FileIo(_) => BuiltinDomain::FileIo,
            Builtin::Logging(_) => BuiltinDomain::Logging,
            Builtin::List(_) => BuiltinDomain::List,
            Builtin::Math(_) => BuiltinDomain::Math,
            Builtin::Module(_) => BuiltinDomain::Module,
            Builtin::Sys(_) => BuiltinDomain::Sys,
            Builtin::Time(_) => BuiltinDomain::Time,
            Builtin::WebServer(_) => BuiltinDomain::WebServer,
            Builtin::WebClient(_) => BuiltinDomain::WebClient,
            Builtin::Encoder(_) => BuiltinDomain::Encoder,
            Builtin::Serializer(_) => BuiltinDomain::Serializer,
            Builtin::Core(_) => BuiltinDomain::Core,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Builtin::Argv(b) => b.as_str(),
            Builtin::Console(b) => b.as_str(),
            Builtin::Env(b) => b.as_str(),
            Builtin::FileIo(b) => b.as_str(),
            Builtin::Logging(b) => b.as_str(),
            Builtin::List(b) => b.as_str(),
            Builtin::Math(b) => b.as_str(),
            Builtin::Module(b) => b.as_str(),
            Builtin::Sys(b) => b.as_str(),
            Builtin::Time(b) => b.as_str(),
            Builtin::WebServer(b) => b.as_str(),
            Builtin::WebClient(b) => b.as_str(),
            Builtin::Encoder(b) => b.as_str(),
            Builtin::Serializer(b) => b.as_str(),
            Builtin::Core(b) => b.as_str(),
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static::lazy_static! {
    /// Union of the global domain tables. When a spelling appears in more than
    /// one domain the earliest domain in precedence order owns it.
    static ref BUILTIN_METHODS: HashMap<&'static str, Builtin> = {
        let mut methods = HashMap::new();
        for domain in BuiltinDomain::PRECEDENCE {
            for name in domain_names(domain) {
                if let Some(builtin) = domain.classify(name) {
                    methods.entry(name).or_insert(builtin);
                }
            }
        }
        methods
    };
}

fn domain_names(domain: BuiltinDomain) -> Vec<&'static str> {
    fn spellings<T: Copy>(all: &[T], as_str: fn(T) -> &'static str) -> Vec<&'static str> {
        all.iter().map(|entry| as_str(*entry)).collect()
    }

    match domain {
        BuiltinDomain::Argv => spellings(ArgvBuiltin::ALL, ArgvBuiltin::as_str),
        BuiltinDomain::Console => spellings(ConsoleBuiltin::ALL, ConsoleBuiltin::as_str),
        BuiltinDomain::Env => spellings(EnvBuiltin::ALL, EnvBuiltin::as_str),
        BuiltinDomain::FileIo => spellings(FileIoBuiltin::ALL, FileIoBuiltin::as_str),
        BuiltinDomain::Logging => spellings(LoggingBuiltin::ALL, LoggingBuiltin::as_str),
        BuiltinDomain::List => spellings(ListBuiltin::ALL, ListBuiltin::as_str),
        BuiltinDomain::Math => spellings(MathBuiltin::ALL, MathBuiltin::as_str),
        BuiltinDomain::Module => spellings(ModuleBuiltin::ALL, ModuleBuiltin::as_str),
        BuiltinDomain::Sys => spellings(SysBuiltin::ALL, SysBuiltin::as_str),
        BuiltinDomain::Time => spellings(TimeBuiltin::ALL, TimeBuiltin::as_str),
        BuiltinDomain::WebServer => spellings(WebServerBuiltin::ALL, WebServerBuiltin::as_str),
        BuiltinDomain::WebClient => spellings(WebClientBuiltin::ALL, WebClientBuiltin::as_str),
        BuiltinDomain::Encoder => spellings(EncoderBuiltin::ALL, EncoderBuiltin::as_str),
        BuiltinDomain::Serializer => {
            spellings(SerializerBuiltin::ALL, SerializerBuiltin::as_str)
        }
        BuiltinDomain::Core => spellings(CoreBuiltin::ALL, CoreBuiltin::as_str),
    }
}

/// Looks `text` up in the global builtin tables (every domain but `Core`)
pub fn builtin_method(text: &str) -> Option<Builtin> {
    BUILTIN_METHODS.get(text).copied()
}

/// Looks `text` up in the called-builtin table
pub fn called_builtin(text: &str) -> Option<Builtin> {
    CoreBuiltin::lookup(text).map(Builtin::Core)
}
