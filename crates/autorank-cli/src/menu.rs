//! Fixed choice menus and keystroke interpretation.

/// A numbered menu selected with keys `1..=N`.
#[derive(Debug, Clone, Copy)]
pub struct Menu {
    pub question: &'static str,
    pub options: &'static [&'static str],
}

pub const CAR_TYPES: Menu = Menu {
    question: "What type of car do you like? (enter number)?",
    options: &["Sedan", "SUV", "Wagen", "Compact", "Convertible"],
};

pub const CAR_FEATURES: Menu = Menu {
    question: "What type of car features do you prefer (enter number)?",
    options: &[
        "Compact",
        "Performance",
        "Midsize",
        "Premium",
        "Stylish",
        "Family",
        "Sports",
        "Adventurous",
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Picked(&'static str),
    /// The key was not a valid option; the first option was used instead.
    Defaulted(&'static str),
}

impl Choice {
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Choice::Picked(v) | Choice::Defaulted(v) => v,
        }
    }
}

impl Menu {
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut line = self.question.to_string();
        for (i, option) in self.options.iter().enumerate() {
            line.push_str(&format!(" {}. {}", i + 1, option));
        }
        line
    }

    #[must_use]
    pub fn choose(&self, key: Option<char>) -> Choice {
        let picked = key
            .and_then(|k| k.to_digit(10))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| (1..=self.options.len()).contains(n))
            .map(|n| self.options[n - 1]);

        match picked {
            Some(v) => Choice::Picked(v),
            None => Choice::Defaulted(self.options[0]),
        }
    }
}

/// What the user said about the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Liked,
    NotLiked,
    /// Any other key; scored like [`Feedback::NotLiked`].
    Invalid,
}

impl Feedback {
    #[must_use]
    pub fn from_key(key: Option<char>) -> Self {
        match key.map(|k| k.to_ascii_uppercase()) {
            Some('Y') => Feedback::Liked,
            Some('N') => Feedback::NotLiked,
            _ => Feedback::Invalid,
        }
    }

    #[must_use]
    pub fn reward(self) -> f32 {
        match self {
            Feedback::Liked => 1.0,
            Feedback::NotLiked | Feedback::Invalid => 0.0,
        }
    }
}

/// `Q` in either case ends the session; so does running out of input.
#[must_use]
pub fn wants_exit(key: Option<char>) -> bool {
    match key {
        Some(k) => k.eq_ignore_ascii_case(&'q'),
        None => true,
    }
}
