//! Theme-independent base styles of the code block.
//!
//! Everything here reads colors and sizes through `var(--cf-*)`, so a single
//! copy serves every theme. The CSS is written nested under the block
//! selector and flattened before it leaves the engine.

use super::emitter::BLOCK_SELECTOR;
use crate::style::css_var;

/// Switches for the optional parts of the base styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStyleOptions {
    pub use_style_reset: bool,
    pub use_themed_scrollbars: bool,
    pub use_themed_selection_colors: bool,
}

/// Returns the core base styles as nested CSS.
pub fn core_base_styles(options: BaseStyleOptions) -> String {
    let mut css = String::new();
    css.push_str(BLOCK_SELECTOR);
    css.push('{');

    if options.use_style_reset {
        css.push_str(RESET);
    }

    css.push_str(&format!(
        "position:relative;\
         margin-block:1rem;\
         font-family:{ui_font_family};\
         font-size:{ui_font_size};\
         font-weight:{ui_font_weight};\
         line-height:{ui_line_height};\
         text-size-adjust:none;\
         -webkit-text-size-adjust:none;\
         & pre{{\
           display:flex;\
           margin:0;\
           padding:0;\
           border:{border_width} solid {border_color};\
           border-radius:{border_radius};\
           background:{code_background};\
           overflow-x:auto;\
           &:focus-visible{{outline:3px solid {focus_border};outline-offset:-3px}}\
           & > code{{\
             all:unset;\
             display:block;\
             flex:1 0 100%;\
             padding:{code_padding_block} 0;\
             color:{code_foreground};\
             font-family:{code_font_family};\
             font-size:{code_font_size};\
             font-weight:{code_font_weight};\
             line-height:{code_line_height};\
           }}\
         }}\
         & .ln{{\
           display:flex;\
           padding-inline:{code_padding_inline};\
           &.gutter{{padding-inline-start:0}}\
           & .gutter{{\
             position:sticky;\
             inset-inline-start:0;\
             z-index:1;\
             flex-shrink:0;\
             padding-inline:{code_padding_inline} 1ch;\
             margin-inline-end:1ch;\
             border-inline-end:{gutter_border_width} solid {gutter_border_color};\
             background:{code_background};\
             color:{gutter_foreground};\
             text-align:end;\
             user-select:none;\
           }}\
           &.highlight .gutter{{color:{gutter_highlight_foreground}}}\
         }}\
         & .header{{\
           padding:{ui_padding_block} {ui_padding_inline};\
           color:{code_foreground};\
         }}",
        ui_font_family = css_var("uiFontFamily"),
        ui_font_size = css_var("uiFontSize"),
        ui_font_weight = css_var("uiFontWeight"),
        ui_line_height = css_var("uiLineHeight"),
        ui_padding_block = css_var("uiPaddingBlock"),
        ui_padding_inline = css_var("uiPaddingInline"),
        border_width = css_var("borderWidth"),
        border_color = css_var("borderColor"),
        border_radius = css_var("borderRadius"),
        focus_border = css_var("focusBorder"),
        code_background = css_var("codeBackground"),
        code_foreground = css_var("codeForeground"),
        code_font_family = css_var("codeFontFamily"),
        code_font_size = css_var("codeFontSize"),
        code_font_weight = css_var("codeFontWeight"),
        code_line_height = css_var("codeLineHeight"),
        code_padding_block = css_var("codePaddingBlock"),
        code_padding_inline = css_var("codePaddingInline"),
        gutter_border_width = css_var("gutterBorderWidth"),
        gutter_border_color = css_var("gutterBorderColor"),
        gutter_foreground = css_var("gutterForeground"),
        gutter_highlight_foreground = css_var("gutterHighlightForeground"),
    ));

    css.push_str(&format!(
        "& pre ::selection,& pre::selection{{background:{}}}",
        css_var("codeSelectionBackground")
    ));

    if options.use_themed_scrollbars {
        css.push_str(&format!(
            "& pre{{\
               scrollbar-color:{thumb} transparent;\
               &::-webkit-scrollbar{{width:0.4rem;height:0.4rem;background:transparent}}\
               &::-webkit-scrollbar-thumb{{background:{thumb};border-radius:0.4rem}}\
               &::-webkit-scrollbar-thumb:hover{{background:{thumb_hover}}}\
             }}",
            thumb = css_var("scrollbarThumbColor"),
            thumb_hover = css_var("scrollbarThumbHoverColor"),
        ));
    }

    if options.use_themed_selection_colors {
        css.push_str(&format!(
            "& :not(pre) ::selection,& :not(pre)::selection{{background:{};color:{}}}",
            css_var("uiSelectionBackground"),
            css_var("uiSelectionForeground"),
        ));
    }

    css.push('}');
    css
}

/// Resets inherited page styles inside the block. Token spans keep their
/// inline variables.
const RESET: &str = "& *:not(path){\
     all:revert;\
     box-sizing:border-box;\
   }\
   & *:not(path):where(span[style^='--']){all:unset}";
