//! Template environment. Templates are compiled into the binary; names ending
//! in `.html` are auto-escaped.

use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("_results.html", include_str!("../templates/_results.html")),
    ("_upload_form.html", include_str!("../templates/_upload_form.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("analysis.html", include_str!("../templates/analysis.html")),
    ("student.html", include_str!("../templates/student.html")),
    ("profile.html", include_str!("../templates/profile.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
