//! Toolbox builder: the block palette offered for the editing target.
//!
//! `build_toolbox` is pure. The same `(is_stage, target_id, dynamic_blocks_xml)` always
//! yields an equal description and byte-identical XML.

use serde::Serialize;
use std::fmt::Write;

/// Position shadows refreshed from the editing target's coordinates.
pub const POSITION_SHADOW_KEYS: [&str; 6] = ["glidex", "glidey", "movex", "movey", "setx", "sety"];

const STAGE_MOTION_LABEL: &str = "Stage selected: no motion blocks";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolboxDescription {
    pub categories: Vec<ToolboxCategory>,
    /// Extension categories as handed over by the runtime, appended verbatim.
    pub dynamic_xml: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolboxCategory {
    pub name: String,
    pub id: String,
    pub colour: String,
    pub secondary_colour: String,
    pub custom: Option<String>,
    pub items: Vec<ToolboxItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolboxItem {
    Block(BlockTemplate),
    Label { text: String },
    Gap { size: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTemplate {
    pub opcode: String,
    pub inputs: Vec<InputDefault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputDefault {
    pub name: String,
    pub shadow: String,
    pub shadow_id: Option<String>,
    pub field: String,
    pub value: String,
}

impl ToolboxDescription {
    pub fn category(&self, name: &str) -> Option<&ToolboxCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Every scoped shadow id with its literal default.
    pub fn shadow_defaults(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .filter_map(|item| match item {
                ToolboxItem::Block(block) => Some(block),
                _ => None,
            })
            .flat_map(|block| block.inputs.iter())
            .filter_map(|input| {
                input
                    .shadow_id
                    .as_deref()
                    .map(|id| (id, input.value.as_str()))
            })
            .collect()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(16 * 1024);
        out.push_str("<xml style=\"display: none\">\n");
        for category in &self.categories {
            write_category(&mut out, category);
        }
        if !self.dynamic_xml.is_empty() {
            out.push_str(&self.dynamic_xml);
            out.push('\n');
        }
        out.push_str("</xml>");
        out
    }
}

pub fn position_shadow_id(target_id: &str, key: &str) -> String {
    format!("{target_id}_{key}")
}

pub fn build_toolbox(is_stage: bool, target_id: &str, dynamic_blocks_xml: &str) -> ToolboxDescription {
    ToolboxDescription {
        categories: vec![
            motion(is_stage, target_id),
            looks(is_stage),
            sound(),
            events(is_stage),
            control(is_stage),
            sensing(is_stage),
            operators(),
            variables(),
            my_blocks(),
        ],
        dynamic_xml: dynamic_blocks_xml.trim().to_string(),
    }
}

fn category(name: &str, id: &str, colour: &str, secondary: &str) -> ToolboxCategory {
    ToolboxCategory {
        name: name.to_string(),
        id: id.to_string(),
        colour: colour.to_string(),
        secondary_colour: secondary.to_string(),
        custom: None,
        items: Vec::new(),
    }
}

fn block(opcode: &str) -> BlockTemplate {
    BlockTemplate {
        opcode: opcode.to_string(),
        inputs: Vec::new(),
    }
}

impl BlockTemplate {
    fn shadow(mut self, name: &str, shadow: &str, field: &str, value: &str) -> Self {
        self.inputs.push(InputDefault {
            name: name.to_string(),
            shadow: shadow.to_string(),
            shadow_id: None,
            field: field.to_string(),
            value: value.to_string(),
        });
        self
    }

    fn num(self, name: &str, value: &str) -> Self {
        self.shadow(name, "math_number", "NUM", value)
    }

    fn positive(self, name: &str, value: &str) -> Self {
        self.shadow(name, "math_positive_number", "NUM", value)
    }

    fn whole(self, name: &str, value: &str) -> Self {
        self.shadow(name, "math_whole_number", "NUM", value)
    }

    fn angle(self, name: &str, value: &str) -> Self {
        self.shadow(name, "math_angle", "NUM", value)
    }

    fn text(self, name: &str, value: &str) -> Self {
        self.shadow(name, "text", "TEXT", value)
    }

    /// A number shadow whose id is scoped to the target so its value can be patched later.
    fn position(mut self, name: &str, target_id: &str, key: &str) -> Self {
        self.inputs.push(InputDefault {
            name: name.to_string(),
            shadow: "math_number".to_string(),
            shadow_id: Some(position_shadow_id(target_id, key)),
            field: "NUM".to_string(),
            value: "0".to_string(),
        });
        self
    }
}

impl ToolboxCategory {
    fn with(mut self, item: BlockTemplate) -> Self {
        self.items.push(ToolboxItem::Block(item));
        self
    }

    fn gap(mut self) -> Self {
        self.items.push(ToolboxItem::Gap { size: 36 });
        self
    }

    fn label(mut self, text: &str) -> Self {
        self.items.push(ToolboxItem::Label {
            text: text.to_string(),
        });
        self
    }

    fn custom(mut self, custom: &str) -> Self {
        self.custom = Some(custom.to_string());
        self
    }
}

fn motion(is_stage: bool, target_id: &str) -> ToolboxCategory {
    let cat = category("Motion", "motion", "#4C97FF", "#3373CC");
    if is_stage {
        return cat.label(STAGE_MOTION_LABEL);
    }

    cat.with(block("motion_movesteps").num("STEPS", "10"))
        .with(block("motion_turnright").num("DEGREES", "15"))
        .with(block("motion_turnleft").num("DEGREES", "15"))
        .gap()
        .with(block("motion_goto").shadow("TO", "motion_goto_menu", "TO", "_random_"))
        .with(
            block("motion_gotoxy")
                .position("X", target_id, "movex")
                .position("Y", target_id, "movey"),
        )
        .with(
            block("motion_glideto")
                .num("SECS", "1")
                .shadow("TO", "motion_glideto_menu", "TO", "_random_"),
        )
        .with(
            block("motion_glidesecstoxy")
                .num("SECS", "1")
                .position("X", target_id, "glidex")
                .position("Y", target_id, "glidey"),
        )
        .gap()
        .with(block("motion_pointindirection").angle("DIRECTION", "90"))
        .with(block("motion_pointtowards").shadow(
            "TOWARDS",
            "motion_pointtowards_menu",
            "TOWARDS",
            "_mouse_",
        ))
        .gap()
        .with(block("motion_changexby").num("DX", "10"))
        .with(block("motion_setx").position("X", target_id, "setx"))
        .with(block("motion_changeyby").num("DY", "10"))
        .with(block("motion_sety").position("Y", target_id, "sety"))
        .gap()
        .with(block("motion_ifonedgebounce"))
        .with(block("motion_setrotationstyle"))
        .gap()
        .with(block("motion_xposition"))
        .with(block("motion_yposition"))
        .with(block("motion_direction"))
}

fn looks(is_stage: bool) -> ToolboxCategory {
    let cat = category("Looks", "looks", "#9966FF", "#774DCB");
    let cat = if is_stage {
        cat.with(block("looks_switchbackdropto").shadow(
            "BACKDROP",
            "looks_backdrops",
            "BACKDROP",
            "",
        ))
        .with(block("looks_switchbackdroptoandwait").shadow(
            "BACKDROP",
            "looks_backdrops",
            "BACKDROP",
            "",
        ))
        .with(block("looks_nextbackdrop"))
    } else {
        cat.with(block("looks_sayforsecs").text("MESSAGE", "Hello!").num("SECS", "2"))
            .with(block("looks_say").text("MESSAGE", "Hello!"))
            .with(block("looks_thinkforsecs").text("MESSAGE", "Hmm...").num("SECS", "2"))
            .with(block("looks_think").text("MESSAGE", "Hmm..."))
            .gap()
            .with(block("looks_switchcostumeto").shadow("COSTUME", "looks_costume", "COSTUME", ""))
            .with(block("looks_nextcostume"))
            .with(block("looks_switchbackdropto").shadow(
                "BACKDROP",
                "looks_backdrops",
                "BACKDROP",
                "",
            ))
            .with(block("looks_nextbackdrop"))
            .gap()
            .with(block("looks_changesizeby").num("CHANGE", "10"))
            .with(block("looks_setsizeto").num("SIZE", "100"))
    };

    let cat = cat
        .gap()
        .with(block("looks_changeeffectby").num("CHANGE", "25"))
        .with(block("looks_seteffectto").num("VALUE", "0"))
        .with(block("looks_cleargraphiceffects"))
        .gap();

    if is_stage {
        cat.with(block("looks_backdropnumbername"))
    } else {
        cat.with(block("looks_show"))
            .with(block("looks_hide"))
            .gap()
            .with(block("looks_gotofrontback"))
            .with(block("looks_goforwardbackwardlayers").whole("NUM", "1"))
            .gap()
            .with(block("looks_costumenumbername"))
            .with(block("looks_backdropnumbername"))
            .with(block("looks_size"))
    }
}

fn sound() -> ToolboxCategory {
    category("Sound", "sound", "#CF63CF", "#BD42BD")
        .with(block("sound_playuntildone").shadow("SOUND_MENU", "sound_sounds_menu", "SOUND_MENU", ""))
        .with(block("sound_play").shadow("SOUND_MENU", "sound_sounds_menu", "SOUND_MENU", ""))
        .with(block("sound_stopallsounds"))
        .gap()
        .with(block("sound_changeeffectby").num("VALUE", "10"))
        .with(block("sound_seteffectto").num("VALUE", "100"))
        .with(block("sound_cleareffects"))
        .gap()
        .with(block("sound_changevolumeby").num("VOLUME", "-10"))
        .with(block("sound_setvolumeto").num("VOLUME", "100"))
        .with(block("sound_volume"))
}

fn events(is_stage: bool) -> ToolboxCategory {
    let cat = category("Events", "events", "#FFBF00", "#CC9900")
        .with(block("event_whenflagclicked"))
        .with(block("event_whenkeypressed"));
    let cat = if is_stage {
        cat.with(block("event_whenstageclicked"))
    } else {
        cat.with(block("event_whenthisspriteclicked"))
    };
    cat.with(block("event_whenbackdropswitchesto"))
        .gap()
        .with(block("event_whengreaterthan").num("VALUE", "10"))
        .gap()
        .with(block("event_whenbroadcastreceived"))
        .with(block("event_broadcast").shadow(
            "BROADCAST_INPUT",
            "event_broadcast_menu",
            "BROADCAST_OPTION",
            "message1",
        ))
        .with(block("event_broadcastandwait").shadow(
            "BROADCAST_INPUT",
            "event_broadcast_menu",
            "BROADCAST_OPTION",
            "message1",
        ))
}

fn control(is_stage: bool) -> ToolboxCategory {
    let cat = category("Control", "control", "#FFAB19", "#CF8B17")
        .with(block("control_wait").positive("DURATION", "1"))
        .gap()
        .with(block("control_repeat").whole("TIMES", "10"))
        .with(block("control_forever"))
        .gap()
        .with(block("control_if"))
        .with(block("control_if_else"))
        .with(block("control_wait_until"))
        .with(block("control_repeat_until"))
        .gap()
        .with(block("control_stop"))
        .gap();

    if is_stage {
        cat.with(block("control_create_clone_of").shadow(
            "CLONE_OPTION",
            "control_create_clone_of_menu",
            "CLONE_OPTION",
            "",
        ))
    } else {
        cat.with(block("control_start_as_clone"))
            .with(block("control_create_clone_of").shadow(
                "CLONE_OPTION",
                "control_create_clone_of_menu",
                "CLONE_OPTION",
                "_myself_",
            ))
            .with(block("control_delete_this_clone"))
    }
}

fn sensing(is_stage: bool) -> ToolboxCategory {
    let cat = category("Sensing", "sensing", "#5CB1D6", "#2E8EB8");
    let cat = if is_stage {
        cat
    } else {
        cat.with(block("sensing_touchingobject").shadow(
            "TOUCHINGOBJECTMENU",
            "sensing_touchingobjectmenu",
            "TOUCHINGOBJECTMENU",
            "_mouse_",
        ))
        .with(block("sensing_touchingcolor"))
        .with(block("sensing_coloristouchingcolor"))
        .with(block("sensing_distanceto").shadow(
            "DISTANCETOMENU",
            "sensing_distancetomenu",
            "DISTANCETOMENU",
            "_mouse_",
        ))
        .gap()
    };

    let cat = cat
        .with(block("sensing_askandwait").text("QUESTION", "What's your name?"))
        .with(block("sensing_answer"))
        .gap()
        .with(block("sensing_keypressed"))
        .with(block("sensing_mousedown"))
        .with(block("sensing_mousex"))
        .with(block("sensing_mousey"))
        .gap();

    let cat = if is_stage {
        cat
    } else {
        cat.with(block("sensing_setdragmode")).gap()
    };

    let object_default = if is_stage { "" } else { "_stage_" };
    cat.with(block("sensing_loudness"))
        .gap()
        .with(block("sensing_timer"))
        .with(block("sensing_resettimer"))
        .gap()
        .with(block("sensing_of").shadow(
            "OBJECT",
            "sensing_of_object_menu",
            "OBJECT",
            object_default,
        ))
        .gap()
        .with(block("sensing_current"))
        .with(block("sensing_dayssince2000"))
        .gap()
        .with(block("sensing_username"))
}

fn operators() -> ToolboxCategory {
    category("Operators", "operators", "#59C059", "#389438")
        .with(block("operator_add").num("NUM1", "").num("NUM2", ""))
        .with(block("operator_subtract").num("NUM1", "").num("NUM2", ""))
        .with(block("operator_multiply").num("NUM1", "").num("NUM2", ""))
        .with(block("operator_divide").num("NUM1", "").num("NUM2", ""))
        .gap()
        .with(block("operator_random").num("FROM", "1").num("TO", "10"))
        .gap()
        .with(block("operator_gt").text("OPERAND1", "").text("OPERAND2", "50"))
        .with(block("operator_lt").text("OPERAND1", "").text("OPERAND2", "50"))
        .with(block("operator_equals").text("OPERAND1", "").text("OPERAND2", "50"))
        .gap()
        .with(block("operator_and"))
        .with(block("operator_or"))
        .with(block("operator_not"))
        .gap()
        .with(block("operator_join").text("STRING1", "apple ").text("STRING2", "banana"))
        .with(block("operator_letter_of").whole("LETTER", "1").text("STRING", "apple"))
        .with(block("operator_length").text("STRING", "apple"))
        .with(block("operator_contains").text("STRING1", "apple").text("STRING2", "a"))
        .gap()
        .with(block("operator_mod").num("NUM1", "").num("NUM2", ""))
        .with(block("operator_round").num("NUM", ""))
        .gap()
        .with(block("operator_mathop").num("NUM", ""))
}

fn variables() -> ToolboxCategory {
    category("Variables", "data", "#FF8C1A", "#DB6E00").custom("VARIABLE")
}

fn my_blocks() -> ToolboxCategory {
    category("My Blocks", "more", "#FF6680", "#FF4D6A").custom("PROCEDURE")
}

fn write_category(out: &mut String, category: &ToolboxCategory) {
    let _ = write!(
        out,
        "  <category name=\"{}\" id=\"{}\" colour=\"{}\" secondaryColour=\"{}\"",
        escape_attr(&category.name),
        escape_attr(&category.id),
        escape_attr(&category.colour),
        escape_attr(&category.secondary_colour),
    );
    if let Some(custom) = &category.custom {
        let _ = write!(out, " custom=\"{}\"", escape_attr(custom));
    }
    if category.items.is_empty() {
        out.push_str("></category>\n");
        return;
    }
    out.push_str(">\n");

    for item in &category.items {
        match item {
            ToolboxItem::Block(block) => write_block(out, block),
            ToolboxItem::Label { text } => {
                let _ = writeln!(out, "    <label text=\"{}\"></label>", escape_attr(text));
            }
            ToolboxItem::Gap { size } => {
                let _ = writeln!(out, "    <sep gap=\"{size}\"/>");
            }
        }
    }
    out.push_str("  </category>\n");
}

fn write_block(out: &mut String, block: &BlockTemplate) {
    let _ = write!(out, "    <block type=\"{}\">", escape_attr(&block.opcode));
    for input in &block.inputs {
        let _ = write!(out, "<value name=\"{}\">", escape_attr(&input.name));
        let _ = write!(out, "<shadow type=\"{}\"", escape_attr(&input.shadow));
        if let Some(id) = &input.shadow_id {
            let _ = write!(out, " id=\"{}\"", escape_attr(id));
        }
        let _ = write!(
            out,
            "><field name=\"{}\">{}</field></shadow></value>",
            escape_attr(&input.field),
            escape_text(&input.value),
        );
    }
    out.push_str("</block>\n");
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/toolbox.rs"]
mod tests;
