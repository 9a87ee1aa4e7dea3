mod test_caps_basic;
mod test_weld_basic;
