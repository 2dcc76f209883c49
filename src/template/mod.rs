//! Templating code.
//!
//! This defines the [`Page`] item, which every HTML response is wrapped in.

use hypertext::prelude::*;

use crate::auth::Session;

/// Disables submit buttons once a form is sent, clears error banners when the
/// form is edited, and keeps a checklist's continue button disabled until
/// every box is ticked. Kept free of characters the text escaper rewrites.
const PAGE_SCRIPT: &str = r#"
document.querySelectorAll(`form[data-submit-once]`).forEach(function (form) {
    form.addEventListener(`submit`, function () {
        form.querySelectorAll(`button[type=submit]`).forEach(function (button) {
            button.disabled = true;
            button.textContent = `Submitting...`;
        });
    });
    form.addEventListener(`input`, function () {
        document.querySelectorAll(`[data-form-error]`).forEach(function (banner) {
            banner.remove();
        });
    });
});
document.querySelectorAll(`form[data-checklist]`).forEach(function (form) {
    var boxes = Array.from(form.querySelectorAll(`input[type=checkbox]`));
    var button = form.querySelector(`button[type=submit]`);
    function update() {
        button.disabled = !boxes.every(function (box) { return box.checked; });
    }
    boxes.forEach(function (box) { box.addEventListener(`change`, update); });
    update();
});
"#;

pub struct Page<R: Renderable> {
    body: Option<R>,
    session: Option<Session>,
    title: Option<String>,
}

impl<R: Renderable> Page<R> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn body(mut self, body: R) -> Self {
        self.body = Some(body);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session_opt(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    /// Used for both the document title and the navigation brand.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl<R: Renderable> Renderable for Page<R> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let title = self.title.as_deref().unwrap_or("Ideathon");
        maud! {
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    meta
                        name="viewport"
                        content="width=device-width, initial-scale=1";
                    link
                        href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css"
                        rel="stylesheet"
                        crossorigin="anonymous";
                }
                body class="d-flex flex-column min-vh-100" {
                    nav class="navbar navbar-expand"
                        style="background-color: #452859;"
                        data-bs-theme="dark" {
                        div class="container" {
                            a class="navbar-brand text-white fw-bold" href="/" {
                                (title)
                            }
                            ul class="navbar-nav align-items-center" style="gap: 1rem;" {
                                @if let Some(session) = &self.session {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/register" {
                                            (session.email())
                                        }
                                    }
                                    li class="nav-item" {
                                        form method="post" action="/auth/sign-out" class="m-0" {
                                            button type="submit" class="btn btn-sm btn-outline-light" {
                                                "Sign out"
                                            }
                                        }
                                    }
                                } @else {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/auth/sign-in" {
                                            "Sign in"
                                        }
                                    }
                                }
                            }
                        }
                    }
                    main class="flex-grow-1" {
                        @if let Some(body) = &self.body {
                            (body)
                        }
                    }
                    footer class="py-4 text-center text-muted border-top" {
                        (format!("{title}. All rights reserved."))
                    }
                    script { (PAGE_SCRIPT) }
                }
            }
        }.render_to(buffer)
    }
}

impl<R: Renderable> Default for Page<R> {
    fn default() -> Self {
        Self {
            body: Default::default(),
            session: Default::default(),
            title: Default::default(),
        }
    }
}
