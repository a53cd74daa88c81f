//! Terminal price form.
//!
//! Asks for each coffee attribute in turn. An empty answer keeps the shown
//! default; answers outside the accepted domain are rejected and asked again.
//! `q` or end of input abandons the form.

use crema_data::CoffeeAttributes;
use crema_data::coffee::{
    BEAN_COST_RANGE, BEAN_ORIGINS, COMPETITOR_PRICE_RANGE, FLAVOR_PROFILES, MONTH_RANGE,
    RATING_RANGE, ROAST_LEVELS,
};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Prompt-driven form over any line reader and writer.
#[derive(Debug)]
pub(crate) struct PriceForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PriceForm<R, W> {
    pub(crate) const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub(crate) fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Collect one set of attributes, or `None` when the user quits.
    pub(crate) fn read_attributes(&mut self) -> io::Result<Option<CoffeeAttributes>> {
        let defaults = CoffeeAttributes::default();

        let Some(bean_origin) = self.choice("Bean origin", &BEAN_ORIGINS, &defaults.bean_origin)?
        else {
            return Ok(None);
        };
        let Some(roast_level) = self.choice("Roast level", &ROAST_LEVELS, &defaults.roast_level)?
        else {
            return Ok(None);
        };
        let Some(flavor_profile) =
            self.choice("Flavor profile", &FLAVOR_PROFILES, &defaults.flavor_profile)?
        else {
            return Ok(None);
        };
        let Some(customer_rating) =
            self.number("Customer rating", &RATING_RANGE, defaults.customer_rating)?
        else {
            return Ok(None);
        };
        let Some(competitor_price) = self.number(
            "Competitor price (INR)",
            &COMPETITOR_PRICE_RANGE,
            defaults.competitor_price,
        )?
        else {
            return Ok(None);
        };
        let Some(bean_cost) =
            self.number("Bean cost (INR/kg)", &BEAN_COST_RANGE, defaults.bean_cost)?
        else {
            return Ok(None);
        };
        let Some(month) = self.number("Month", &MONTH_RANGE, defaults.month)? else {
            return Ok(None);
        };

        Ok(Some(CoffeeAttributes {
            bean_origin,
            roast_level,
            flavor_profile,
            customer_rating,
            competitor_price,
            bean_cost,
            month,
        }))
    }

    fn choice(&mut self, label: &str, options: &[&str], default: &str) -> io::Result<Option<String>> {
        loop {
            let Some(answer) = self.ask(&format!("{} [{}] ({})", label, default, options.join("/")))?
            else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default.to_string()));
            }
            match options.iter().find(|o| o.eq_ignore_ascii_case(&answer)) {
                Some(option) => return Ok(Some((*option).to_string())),
                None => writeln!(self.output, "  Choose one of: {}", options.join(", "))?,
            }
        }
    }

    fn number<T>(
        &mut self,
        label: &str,
        range: &RangeInclusive<T>,
        default: T,
    ) -> io::Result<Option<T>>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        loop {
            let Some(answer) = self.ask(&format!(
                "{} [{}] ({}-{})",
                label,
                default,
                range.start(),
                range.end()
            ))?
            else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<T>() {
                Ok(value) if range.contains(&value) => return Ok(Some(value)),
                _ => writeln!(
                    self.output,
                    "  Enter a number between {} and {}",
                    range.start(),
                    range.end()
                )?,
            }
        }
    }

    /// Print a prompt and read one trimmed line; `None` on quit or end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }
}
