//! Option keys of the plug-in's enumerated settings

macro_rules! option_keys {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in option order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Symbolic key stored as the setting value
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            /// Parse a symbolic key
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

option_keys! {
    /// How the plug-in was invoked
    RunMode {
        Interactive => "interactive",
        NonInteractive => "non_interactive",
        RunWithLastVals => "run_with_last_vals",
    }
}

option_keys! {
    /// How file extensions in layer names are treated
    FileExtMode {
        NoSpecialHandling => "no_special_handling",
        OnlyMatchingFileExtension => "only_matching_file_extension",
        UseAsFileExtensions => "use_as_file_extensions",
    }
}

option_keys! {
    /// When to strip file extensions from layer names
    StripMode {
        Always => "always",
        Identical => "identical",
        Never => "never",
    }
}

option_keys! {
    /// How layers named in [square brackets] are treated
    SquareBracketedMode {
        Normal => "normal",
        Background => "background",
        Ignore => "ignore",
        IgnoreOther => "ignore_other",
    }
}

option_keys! {
    /// What to do when an exported file already exists
    OverwriteMode {
        Replace => "replace",
        Skip => "skip",
        RenameNew => "rename_new",
        RenameExisting => "rename_existing",
        Cancel => "cancel",
    }
}
