mod linspace;
mod local_frame;

pub(crate) use {linspace::linspace, local_frame::LocalFrame};
