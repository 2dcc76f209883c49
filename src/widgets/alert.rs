use hypertext::prelude::*;

/// A danger banner. Form pages mark it so that editing the form clears it.
pub struct ErrorAlert<S> {
    pub msg: S,
}

impl<S: ToString> Renderable for ErrorAlert<S> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud!({
            div class="alert alert-danger" role="alert" data-form-error="true" {
                (self.msg.to_string())
            }
        })
        .render_to(buffer);
    }
}

pub struct SuccessAlert<S> {
    pub title: &'static str,
    pub msg: S,
}

impl<S: ToString> Renderable for SuccessAlert<S> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud!({
            div class="alert alert-success" role="alert" {
                h4 class="alert-heading" { (self.title) }
                p class="mb-0" { (self.msg.to_string()) }
            }
        })
        .render_to(buffer);
    }
}
