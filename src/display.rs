use crate::models::PayWay;

/// Presentation triple for a payment provider: heading text, icon tag, and
/// accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStyle {
    pub title: &'static str,
    pub icon: Option<&'static str>,
    pub accent: &'static str,
}

pub fn style_for(pay_way: PayWay) -> DisplayStyle {
    match pay_way {
        PayWay::Wechat => DisplayStyle {
            title: "WeChat Pay",
            icon: Some("wechat"),
            accent: "#07C160",
        },
        PayWay::Alipay => DisplayStyle {
            title: "Alipay",
            icon: Some("alipay"),
            accent: "#1677FF",
        },
        PayWay::Other => DisplayStyle {
            title: "Scan to Pay",
            icon: None,
            accent: "#666",
        },
    }
}

pub fn success_notice(pay_way: PayWay) -> &'static str {
    match pay_way {
        PayWay::Wechat => "WeChat payment successful",
        PayWay::Alipay => "Alipay payment successful",
        PayWay::Other => "Payment successful",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_for_known_providers() {
        let wechat = style_for(PayWay::Wechat);
        assert_eq!(wechat.title, "WeChat Pay");
        assert_eq!(wechat.accent, "#07C160");
        assert!(wechat.icon.is_some());

        let alipay = style_for(PayWay::Alipay);
        assert_eq!(alipay.title, "Alipay");
        assert_eq!(alipay.accent, "#1677FF");
    }

    #[test]
    fn test_style_for_other() {
        let other = style_for(PayWay::Other);
        assert_eq!(other.title, "Scan to Pay");
        assert!(other.icon.is_none());
        assert_eq!(other.accent, "#666");
    }

    #[test]
    fn test_success_notice_mentions_provider() {
        assert!(success_notice(PayWay::Wechat).contains("WeChat"));
        assert!(success_notice(PayWay::Alipay).contains("Alipay"));
        assert_eq!(success_notice(PayWay::Other), "Payment successful");
    }
}
