// Image Control
// Shows the image source as a captioned placeholder cell block

use crate::core::{ControlData, ControlEntry, ControlKind, Panel, PanelResult};

const IMAGE: &[ControlKind] = &[ControlKind::Image];

impl Panel {
    pub fn add_image(&mut self, title: &str, source: &str) -> PanelResult<&mut Self> {
        let entry = ControlEntry::new(
            title,
            ControlKind::Image,
            ControlData::Image {
                source: source.to_string(),
            },
        );
        self.register(entry)
    }

    pub fn get_image_source(&self, title: &str) -> PanelResult<String> {
        match self.control_of(title, IMAGE)?.data() {
            ControlData::Image { source } => Ok(source.clone()),
            _ => unreachable!("image controls always carry a source"),
        }
    }

    pub fn set_image_source(&mut self, title: &str, source: &str) -> PanelResult<&mut Self> {
        self.control_of_mut(title, IMAGE)?.data = ControlData::Image {
            source: source.to_string(),
        };
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::z_order::LocalZOrder;
    use crate::core::PanelError;
    use std::rc::Rc;

    #[test]
    fn test_image_source() {
        let mut p = Panel::create(0, 0, None).with_z_order(Rc::new(LocalZOrder::new()));
        p.add_image("Preview", "assets/a.png").unwrap();
        p.set_image_source("Preview", "assets/b.png").unwrap();
        assert_eq!(p.get_image_source("Preview").unwrap(), "assets/b.png");
        assert!(matches!(p.get_image_source("Nope"), Err(PanelError::ControlNotFound(_))));
    }
}
