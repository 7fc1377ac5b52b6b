//! Landing page: hero, feature highlights and role selection.

use axum::{extract::State, response::Html};
use minijinja::context;
use serde::Serialize;

use crate::error::WebResult;
use crate::state::SharedState;

#[derive(Serialize)]
struct Feature {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

/// A role card. `kind` picks the card's accent colour.
#[derive(Serialize)]
struct Role {
    kind: &'static str,
    title: &'static str,
    description: &'static str,
    href: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        icon: "brain",
        title: "AI-Powered Analysis",
        description: "Advanced deep learning models for accurate pneumonia classification.",
    },
    Feature {
        icon: "shield",
        title: "Secure Platform",
        description: "HIPAA-compliant security measures to protect patient data.",
    },
    Feature {
        icon: "clock",
        title: "Real-time Results",
        description: "Get instant analysis and classification results.",
    },
];

const ROLES: &[Role] = &[
    Role {
        kind: "doctor",
        title: "For Doctors",
        description: "Access advanced diagnostic tools and manage patient cases efficiently.",
        href: "/dashboard",
    },
    Role {
        kind: "student",
        title: "For Students",
        description: "Learn and practice pneumonia classification with real cases.",
        href: "/student",
    },
];

pub async fn home(State(state): State<SharedState>) -> WebResult<Html<String>> {
    let html = state.templates.render(
        "home.html",
        context! {
            active => "home",
            features => FEATURES,
            roles => ROLES,
        },
    )?;
    Ok(Html(html))
}
