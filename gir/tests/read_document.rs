use std::sync::Arc;

use pretty_assertions::assert_eq;

use sg_gir::{builtins, Diagnostics, Registry, TypeCategory};

const FIXTURE: &str = r#"<?xml version="1.0"?>
<repository version="1.2"
            xmlns="http://www.gtk.org/introspection/core/1.0"
            xmlns:c="http://www.gtk.org/introspection/c/1.0"
            xmlns:glib="http://www.gtk.org/introspection/glib/1.0">
  <namespace name="Demo" version="1.0" shared-library="libdemo.so"
             c:identifier-prefixes="Demo" c:symbol-prefixes="demo">
    <alias name="Index" c:type="DemoIndex">
      <type name="gint" c:type="gint"/>
    </alias>
    <constant name="MAX_ITEMS" value="64" c:type="DEMO_MAX_ITEMS">
      <type name="gint" c:type="gint"/>
    </constant>
    <enumeration name="Mode" c:type="DemoMode">
      <member name="idle" value="0" c:identifier="DEMO_MODE_IDLE"/>
      <member name="busy" value="1" c:identifier="DEMO_MODE_BUSY"/>
    </enumeration>
    <bitfield name="Flags" c:type="DemoFlags">
      <member name="none" value="0" c:identifier="DEMO_FLAGS_NONE"/>
      <member name="fast" value="1" c:identifier="DEMO_FLAGS_FAST"/>
    </bitfield>
    <record name="Item" c:type="DemoItem" c:symbol-prefix="item">
      <constructor name="new" c:identifier="demo_item_new">
        <return-value transfer-ownership="full">
          <type name="Item" c:type="DemoItem*"/>
        </return-value>
      </constructor>
      <constructor name="new_from_file" c:identifier="demo_item_new_from_file">
        <return-value transfer-ownership="full">
          <type name="Item" c:type="DemoItem*"/>
        </return-value>
        <parameters>
          <parameter name="filename" transfer-ownership="none">
            <type name="filename" c:type="const gchar*"/>
          </parameter>
        </parameters>
      </constructor>
      <method name="ref" c:identifier="demo_item_ref">
        <return-value transfer-ownership="full">
          <type name="Item" c:type="DemoItem*"/>
        </return-value>
        <parameters>
          <instance-parameter name="self" transfer-ownership="none">
            <type name="Item" c:type="DemoItem*"/>
          </instance-parameter>
        </parameters>
      </method>
      <method name="unref" c:identifier="demo_item_unref">
        <return-value transfer-ownership="none">
          <type name="none" c:type="void"/>
        </return-value>
        <parameters>
          <instance-parameter name="self" transfer-ownership="none">
            <type name="Item" c:type="DemoItem*"/>
          </instance-parameter>
        </parameters>
      </method>
      <method name="get_name" c:identifier="demo_item_get_name">
        <return-value transfer-ownership="none">
          <type name="utf8" c:type="const gchar*"/>
        </return-value>
        <parameters>
          <instance-parameter name="self" transfer-ownership="none">
            <type name="Item" c:type="DemoItem*"/>
          </instance-parameter>
        </parameters>
      </method>
      <method name="set_name" c:identifier="demo_item_set_name">
        <return-value transfer-ownership="none">
          <type name="none" c:type="void"/>
        </return-value>
        <parameters>
          <instance-parameter name="self" transfer-ownership="none">
            <type name="Item" c:type="DemoItem*"/>
          </instance-parameter>
          <parameter name="name" transfer-ownership="none">
            <type name="utf8" c:type="const gchar*"/>
          </parameter>
        </parameters>
      </method>
    </record>
    <function name="init" c:identifier="demo_init">
      <return-value transfer-ownership="none">
        <type name="none" c:type="void"/>
      </return-value>
    </function>
  </namespace>
</repository>"#;

fn read_fixture() -> (sg_gir::Namespace, sg_gir::RegistrySnapshot, Diagnostics) {
    let diags = Diagnostics::new();
    let mut registry = Registry::new();
    builtins::register_builtins(&mut registry, &diags);
    let namespace = sg_gir::read_gir(FIXTURE, &mut registry, &diags).expect("fixture parses");
    (namespace, registry.freeze(), diags)
}

#[test]
fn namespace_carries_document_metadata() {
    let (namespace, _, _) = read_fixture();
    assert_eq!(namespace.name, "Demo");
    assert_eq!(namespace.version, "1.0");
    assert_eq!(namespace.shared_library.as_deref(), Some("libdemo.so"));
    assert_eq!(namespace.aliases.len(), 1);
    assert_eq!(namespace.constants.len(), 1);
    assert_eq!(namespace.enumerations.len(), 1);
    assert_eq!(namespace.bitfields.len(), 1);
    assert_eq!(namespace.records.len(), 1);
    assert_eq!(namespace.functions.len(), 1);
}

#[test]
fn declared_types_resolve_under_both_name_forms() {
    let (_, snapshot, _) = read_fixture();
    for name in ["Item", "Demo.Item"] {
        let named = snapshot.lookup_type(name).expect(name);
        assert_eq!(named.category, TypeCategory::Record);
        assert_eq!(named.c_name, "DemoItem");
    }
    assert_eq!(
        snapshot.lookup_type("Demo.Flags").unwrap().category,
        TypeCategory::Bitfield
    );
    assert_eq!(
        snapshot.resolve_alias("Demo.Index").unwrap().c_name,
        "gint"
    );
}

#[test]
fn retain_release_pair_is_discovered_from_methods() {
    let (namespace, snapshot, _) = read_fixture();
    let item = &namespace.records[0];
    assert_eq!(item.ref_function().unwrap().c_symbol, "demo_item_ref");
    assert_eq!(item.unref_function().unwrap().c_symbol, "demo_item_unref");
    assert!(item.is_reference_counted(&snapshot));
}

#[test]
fn constructors_classify_from_the_parsed_model() {
    let (namespace, snapshot, _) = read_fixture();
    let item: &Arc<_> = &namespace.records[0];
    let new = &item.constructors[0];
    let from_file = &item.constructors[1];

    assert!(new.is_designated_constructor_of(item, &snapshot));
    assert!(!new.is_bare_factory_of(item, &snapshot));
    assert!(from_file.is_factory_of(item, &snapshot));
    assert!(!from_file.is_designated_constructor_of(item, &snapshot));
}

#[test]
fn clean_fixture_produces_no_diagnostics() {
    let (_, _, diags) = read_fixture();
    assert_eq!(diags.entries(), vec![]);
}
