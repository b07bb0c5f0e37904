// src/core/args.rs

//! Leaf actions (flags and commands) and the groups they are declared in.

use anyhow::Result;
use std::cell::OnceCell;
use std::fmt;

/// A single named, invocable flag or command.
///
/// The action is a plain value; the resolver hands it back to the caller when
/// a token matches [`Argument::long`] or [`Argument::short`].
#[derive(Debug, Clone)]
pub struct Argument<A> {
    /// Long form, e.g. `--save`, or an alias name.
    pub long: String,
    /// Optional short form, e.g. `-s`.
    pub short: Option<String>,
    /// What the token resolves to.
    pub action: A,
    /// One line description for help output.
    pub description: String,
}

impl<A> Argument<A> {
    pub fn new(
        long: impl Into<String>,
        short: Option<&str>,
        action: A,
        description: impl Into<String>,
    ) -> Self {
        Self {
            long: long.into(),
            short: short.map(str::to_string),
            action,
            description: description.into(),
        }
    }

    /// Exact match against the long form first, then the short form.
    pub fn matches(&self, token: &str) -> bool {
        self.long == token || self.short.as_deref() == Some(token)
    }

    /// Every token this argument answers to, long form first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.long.as_str()).chain(self.short.as_deref())
    }

    /// The forms as shown in help, e.g. `--save, -s`.
    pub fn forms(&self) -> String {
        match &self.short {
            Some(short) => format!("{}, {}", self.long, short),
            None => self.long.clone(),
        }
    }

    /// A single aligned help line for this argument.
    pub fn help_line(&self, width: usize) -> String {
        format!("  {:<width$}  {}", self.forms(), self.description)
    }
}

/// Produces the members of a lazily evaluated group. `None` means the group does
/// not apply at all (e.g. project commands outside a project).
pub type Supplier<A> = Box<dyn Fn() -> Result<Option<Vec<Argument<A>>>>>;

enum Members<A> {
    Fixed(Vec<Argument<A>>),
    Lazy {
        supplier: Supplier<A>,
        cache: OnceCell<Option<Vec<Argument<A>>>>,
    },
}

/// An ordered, titled set of [`Argument`]s.
pub struct ArgumentGroup<A> {
    title: String,
    members: Members<A>,
    empty_help: Option<String>,
}

impl<A> fmt::Debug for ArgumentGroup<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.members {
            Members::Fixed(args) => format!("fixed({})", args.len()),
            Members::Lazy { cache, .. } => match cache.get() {
                Some(Some(args)) => format!("lazy({})", args.len()),
                Some(None) => "lazy(unavailable)".to_string(),
                None => "lazy(pending)".to_string(),
            },
        };
        f.debug_struct("ArgumentGroup")
            .field("title", &self.title)
            .field("members", &kind)
            .field("empty_help", &self.empty_help)
            .finish()
    }
}

impl<A> ArgumentGroup<A> {
    /// A group with members fixed at construction.
    pub fn new(title: impl Into<String>, arguments: Vec<Argument<A>>) -> Self {
        Self {
            title: title.into(),
            members: Members::Fixed(arguments),
            empty_help: None,
        }
    }

    /// A group whose members come from `supplier`, evaluated on first use and
    /// cached for the lifetime of the group.
    pub fn lazy<F>(title: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Result<Option<Vec<Argument<A>>>> + 'static,
    {
        Self {
            title: title.into(),
            members: Members::Lazy {
                supplier: Box::new(supplier),
                cache: OnceCell::new(),
            },
            empty_help: None,
        }
    }

    /// Text shown in help instead of an empty member list.
    pub fn with_empty_help(mut self, help: impl Into<String>) -> Self {
        self.empty_help = Some(help.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the supplier of a lazy group has already run.
    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        match &self.members {
            Members::Fixed(_) => true,
            Members::Lazy { cache, .. } => cache.get().is_some(),
        }
    }

    fn evaluate(&self) -> Result<Option<&[Argument<A>]>> {
        match &self.members {
            Members::Fixed(args) => Ok(Some(args.as_slice())),
            Members::Lazy { supplier, cache } => {
                let loaded = match cache.get() {
                    Some(loaded) => loaded,
                    None => {
                        let fresh = supplier()?;
                        cache.get_or_init(|| fresh)
                    }
                };
                Ok(loaded.as_deref())
            }
        }
    }

    /// The members in declaration order. Unavailable groups have none.
    pub fn arguments(&self) -> Result<&[Argument<A>]> {
        Ok(self.evaluate()?.unwrap_or(&[]))
    }

    /// Renders groups into help text: the title, then one aligned line per member.
    /// Empty groups show their empty-group help, unavailable groups are skipped.
    pub fn render(groups: &[&Self]) -> Result<String> {
        let mut available = Vec::new();
        for group in groups {
            if let Some(args) = group.evaluate()? {
                available.push((*group, args));
            }
        }

        let width = available
            .iter()
            .flat_map(|(_, args)| args.iter())
            .map(|arg| arg.forms().chars().count())
            .max()
            .unwrap_or(0);

        let mut sections = Vec::new();
        for (group, args) in available {
            let mut lines = Vec::new();
            if !group.title.is_empty() {
                lines.push(format!("{}:", group.title));
            }
            if args.is_empty() {
                match &group.empty_help {
                    Some(help) => lines.push(format!("  {}", help)),
                    None => continue,
                }
            }
            lines.extend(args.iter().map(|arg| arg.help_line(width)));
            sections.push(lines.join("\n"));
        }
        Ok(sections.join("\n\n"))
    }
}
