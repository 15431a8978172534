use crate::quote::quote;
use crate::registry::Registry;

impl<C> Registry<C> {
    /// Render the usage text.
    ///
    /// ```text
    /// Usage: MyCommand [options] VALUE
    /// Options:
    ///     /A, /ABC - The abc option.
    /// ```
    ///
    /// Option lines are indented with a tab. Every line ends with `\n`.
    /// A value placeholder follows each alias, joined by the first configured
    /// delimiter (`=` with the defaults), e.g. `/N=COUNT`.
    pub fn usage(&self) -> String {
        let mut out = format!("Usage: {} [options]", quote(&self.command));
        for arg in &self.arguments {
            out.push(' ');
            out.push_str(&quote(&arg.meta));
            if arg.multiple {
                out.push_str("...");
            }
        }
        out.push('\n');

        out.push_str("Options:\n");
        // Shown between a key and its value placeholder.
        let delimiter = self.delimiters.first().copied().unwrap_or('=');
        for option in &self.options {
            let placeholder = option
                .meta_value()
                .map(|meta| format!("{delimiter}{}", quote(meta)));
            let names: Vec<String> = option
                .keys
                .iter()
                .map(|key| match &placeholder {
                    Some(p) => format!("{}{key}{p}", self.prefix),
                    None => format!("{}{key}", self.prefix),
                })
                .collect();

            out.push('\t');
            out.push_str(&names.join(", "));
            if !option.help.is_empty() {
                out.push_str(" - ");
                out.push_str(&option.help);
            }
            out.push('\n');
        }

        let repeatable: Vec<String> = self
            .options
            .iter()
            .filter(|o| o.multiple)
            .map(|o| format!("{}{}", self.prefix, o.keys[0]))
            .collect();
        if !repeatable.is_empty() {
            out.push_str(&repeatable.join(", "));
            out.push_str(" can be used multiple times.\n");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{ArgumentSpec, OptionSpec};
    use crate::registry::Registry;

    #[test]
    fn renders_flag_and_required_argument() {
        let reg: Registry = Registry::new(
            "MyCommand",
            [OptionSpec::flag("a|abc", "The abc option.", |_| {})],
            [ArgumentSpec::new("VALUE", |_, _| {})],
        )
        .unwrap();

        assert_eq!(
            reg.usage(),
            "Usage: MyCommand [options] VALUE\nOptions:\n\t/A, /ABC - The abc option.\n"
        );
    }

    #[test]
    fn renders_values_lists_and_repeat_summary() {
        let reg: Registry = Registry::builder()
            .command("My Tool")
            .option(OptionSpec::value("n|count", "N", "How many.", |_, _| {}))
            .option(OptionSpec::flag("v", "", |_| {}).multiple())
            .option(OptionSpec::value("i|include", "DIR NAME", "", |_, _| {}).multiple())
            .argument(ArgumentSpec::new("SRC", |_, _| {}))
            .argument(ArgumentSpec::new("MORE FILES", |_, _| {}).optional().multiple())
            .build()
            .unwrap();

        let expected = concat!(
            "Usage: \"My Tool\" [options] SRC \"MORE FILES\"...\n",
            "Options:\n",
            "\t/N=N, /COUNT=N - How many.\n",
            "\t/V\n",
            "\t/I=\"DIR NAME\", /INCLUDE=\"DIR NAME\"\n",
            "/V, /I can be used multiple times.\n",
        );
        assert_eq!(reg.usage(), expected);
    }

    #[test]
    fn follows_configured_prefix_and_delimiter() {
        let reg: Registry = Registry::builder()
            .command("t")
            .prefix('-')
            .delimiters([':'])
            .option(OptionSpec::value("o", "FILE", "", |_, _| {}))
            .build()
            .unwrap();
        assert_eq!(reg.usage(), "Usage: t [options]\nOptions:\n\t-O:FILE\n");
    }

    #[test]
    fn empty_command_is_quoted() {
        let reg: Registry = Registry::builder().build().unwrap();
        assert_eq!(reg.usage(), "Usage: \"\" [options]\nOptions:\n");
    }
}
