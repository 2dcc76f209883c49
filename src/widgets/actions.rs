use hypertext::prelude::*;

/// A row of link buttons, given as `(href, text)` pairs.
pub struct ActionBar<'r> {
    pub options: &'r [(&'r str, &'r str)],
}

impl<'r> Renderable for ActionBar<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            div class="d-flex gap-2 mt-3 mb-3" {
                @for (link, text) in self.options {
                    a class="btn btn-outline-primary" href=(link) {
                        (text)
                    }
                }
            }
        }
        .render_to(buffer);
    }
}
